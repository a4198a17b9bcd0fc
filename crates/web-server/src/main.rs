use database::WarehouseRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use web_server::AppState;

// This main function is the entry point when running `cargo run -p web-server`.
// It stands the API up over an existing warehouse without touching the
// pipeline stages.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = configuration::load_config()?;
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| config.data.database_url.clone());
    let pool = database::connect(&database_url).await?;
    database::run_migrations(&pool).await?;

    let state = Arc::new(AppState::new(
        WarehouseRepository::new(pool),
        config.insights.clone(),
        Duration::from_secs(config.server.metrics_cache_ttl_secs),
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    web_server::run_server(addr, state).await
}
