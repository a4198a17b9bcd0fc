use analytics::{AnalyticsError, InsightEngine, MetricsEngine};
use api_client::YahooFinanceClient;
use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::PipelineStage;
// Import warehouse types directly from the database crate
use database::{TableCount, WarehouseRepository, connect, run_migrations};
use extractor::{DatasetExtractor, QuoteExtractor};
use indicatif::{ProgressBar, ProgressStyle};
use modeler::GoldBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use transformer::SilverTransformer;
use uuid::Uuid;
use web_server::AppState;

/// The main entry point for the Strata pipeline application.
#[tokio::main]
async fn main() {
    // Load environment variables from an optional .env file (DATABASE_URL).
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .expect("Failed to load the configuration file");

    // Initialize the warehouse connection and run migrations
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| config.data.database_url.clone());
    let db_pool = connect(&database_url)
        .await
        .expect("Failed to connect to the warehouse");
    run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");
    let repository = WarehouseRepository::new(db_pool);

    // Every invocation is one pipeline run in the build manifest.
    let run_id = Uuid::new_v4().to_string();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Extract => handle_extract(&config).await,
        Commands::Transform => handle_transform(&config, repository, &run_id).await,
        Commands::Model => handle_model(repository, &run_id).await,
        Commands::Run => handle_run(&config, repository, &run_id).await,
        Commands::Report(args) => handle_report(&config, repository, args).await,
        Commands::Serve => handle_serve(&config, repository).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A medallion-architecture pipeline for retail supply-chain analytics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Snapshot the raw dataset and the daily commodity quote (bronze).
    Extract,
    /// Build the cleaned silver table from the bronze snapshots.
    Transform,
    /// Rebuild the gold star schema and record it in the build manifest.
    Model,
    /// Run the full pipeline: extract, then transform, then model.
    Run,
    /// Print the KPI report, category ranking and insight cards.
    Report(ReportArgs),
    /// Serve the analytics API over HTTP.
    Serve,
}

#[derive(Parser)]
struct ReportArgs {
    /// How many categories to include in the ranking.
    #[arg(long, default_value_t = 10)]
    top: i64,

    /// Emit the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Pipeline Command Logic
// ==============================================================================

/// Handles the bronze stage: both snapshots are taken concurrently.
async fn handle_extract(config: &Config) -> anyhow::Result<()> {
    println!("Starting bronze extraction...");

    let client = YahooFinanceClient::new(&config.market_data);
    let quotes = QuoteExtractor::new(client, &config.data.bronze_dir, &config.market_data.symbol);
    let dataset = DatasetExtractor::new(&config.data.dataset_source, &config.data.bronze_dir);

    // The dataset snapshot is required; the quote is best-effort.
    let (quote, snapshot) = tokio::join!(quotes.snapshot(), dataset.snapshot());
    let snapshot = snapshot?;
    println!("Dataset snapshot: {}", snapshot.display());
    match quote? {
        Some(quote) => println!(
            "Quote snapshot: {} at {} {} ({})",
            quote.indicator, quote.price, quote.currency, quote.source
        ),
        None => println!("Quote feed unavailable; silver will fall back to a zero price."),
    }
    Ok(())
}

/// Handles the silver stage with a live record counter.
async fn handle_transform(
    config: &Config,
    repository: WarehouseRepository,
    run_id: &str,
) -> anyhow::Result<()> {
    let transformer = SilverTransformer::new(
        repository.clone(),
        &config.data.bronze_dir,
        &config.data.dataset_source,
    );

    // Record count is unknown until the CSV has been walked, so this is a
    // counter rather than a bar.
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} records {msg}")?,
    );

    let outcome = transformer
        .run_with_progress(&mut |scanned| progress_bar.set_position(scanned as u64))
        .await?;
    progress_bar.finish_with_message("parsed");

    repository
        .record_builds(
            run_id,
            PipelineStage::Silver,
            &[TableCount {
                table_name: "silver_sales".to_string(),
                row_count: outcome.rows_loaded as i64,
            }],
        )
        .await?;

    println!(
        "Silver build complete: {} rows loaded, {} filtered, {} malformed records skipped.",
        outcome.rows_loaded, outcome.rows_filtered, outcome.rows_skipped_malformed
    );
    println!(
        "Commodity context: ${:.2} | {} countries, {} categories, {} cities.",
        outcome.brent_price,
        outcome.summary.distinct_countries,
        outcome.summary.distinct_categories,
        outcome.summary.distinct_cities
    );
    if outcome.quality.has_violations() {
        println!("Data-quality violations were found; see the logs for details.");
    }
    Ok(())
}

/// Handles the gold stage and prints the validation summary.
async fn handle_model(repository: WarehouseRepository, run_id: &str) -> anyhow::Result<()> {
    println!("Building the gold star schema...");
    let summary = GoldBuilder::new(repository).build(run_id).await?;

    let mut table = Table::new();
    table.set_header(vec!["Table", "Rows"]);
    for count in &summary.tables {
        table.add_row(vec![count.table_name.clone(), count.row_count.to_string()]);
    }
    println!("{table}");

    println!(
        "Fact totals: {} rows | ${:.2} revenue | ${:.2} average profit (run {}).",
        summary.fact.row_count,
        summary.fact.total_sales.unwrap_or(0.0),
        summary.fact.avg_profit.unwrap_or(0.0),
        summary.run_id
    );
    Ok(())
}

/// Runs the three stages back to back, sharing one run id.
async fn handle_run(
    config: &Config,
    repository: WarehouseRepository,
    run_id: &str,
) -> anyhow::Result<()> {
    handle_extract(config).await?;
    handle_transform(config, repository.clone(), run_id).await?;
    handle_model(repository, run_id).await?;
    println!("Pipeline complete (run {run_id}).");
    Ok(())
}

/// Computes the KPI report straight from the warehouse and renders it.
async fn handle_report(
    config: &Config,
    repository: WarehouseRepository,
    args: ReportArgs,
) -> anyhow::Result<()> {
    let rows = repository.fetch_analytical_rows().await?;
    let report = match MetricsEngine::new().calculate(&rows) {
        Ok(report) => report,
        Err(AnalyticsError::NoData(_)) => {
            println!("No analytical data available yet. Run the pipeline first.");
            return Ok(());
        }
    };
    let insights = InsightEngine::new(config.insights.clone()).generate(&report);

    if args.json {
        let payload = serde_json::json!({ "metrics": report, "insights": insights });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "Strata KPI report, generated {}",
        Local::now().format("%d/%m/%Y %H:%M")
    );

    let mut kpis = Table::new();
    kpis.set_header(vec!["Metric", "Value"]);
    kpis.add_row(vec![
        "Total revenue".to_string(),
        format!("${:.2}", report.total_revenue),
    ]);
    kpis.add_row(vec![
        "Total profit".to_string(),
        format!("${:.2}", report.total_profit),
    ]);
    kpis.add_row(vec![
        "Profit margin".to_string(),
        format!("{:.1}%", report.margin_pct),
    ]);
    kpis.add_row(vec!["Orders".to_string(), report.order_count.to_string()]);
    kpis.add_row(vec![
        "Average ticket".to_string(),
        format!("${:.2}", report.average_ticket),
    ]);
    kpis.add_row(vec![
        "Brent average".to_string(),
        format!("${:.2}", report.brent_average),
    ]);
    kpis.add_row(vec![
        "Brent volatility".to_string(),
        format!("±{:.2}", report.brent_volatility),
    ]);
    kpis.add_row(vec![
        "On-time deliveries".to_string(),
        format!("{:.1}%", report.on_time_rate_pct),
    ]);
    kpis.add_row(vec![
        "Sales trend".to_string(),
        format!("{:+.1}%", report.sales_trend_pct),
    ]);
    if let Some(top) = &report.top_category {
        kpis.add_row(vec!["Top category".to_string(), top.clone()]);
    }
    if let Some(weakest) = &report.weakest_category {
        kpis.add_row(vec!["Weakest category".to_string(), weakest.clone()]);
    }
    println!("{kpis}");

    let categories = repository.category_performance(args.top).await?;
    let mut ranking = Table::new();
    ranking.set_header(vec!["Category", "Orders", "Revenue", "Profit", "Avg Brent"]);
    for row in &categories {
        ranking.add_row(vec![
            row.category.clone(),
            row.order_count.to_string(),
            format!("${:.2}", row.total_revenue),
            format!("${:.2}", row.total_profit.unwrap_or(0.0)),
            format!("${:.2}", row.avg_brent_price.unwrap_or(0.0)),
        ]);
    }
    println!("{ranking}");

    let statuses = repository.delivery_status_breakdown().await?;
    let mut deliveries = Table::new();
    deliveries.set_header(vec!["Delivery status", "Orders"]);
    for row in &statuses {
        deliveries.add_row(vec![
            row.delivery_status
                .clone()
                .unwrap_or_else(|| "(none)".to_string()),
            row.order_count.to_string(),
        ]);
    }
    println!("{deliveries}");

    for insight in &insights {
        println!(
            "[{:?}] {}: {}",
            insight.severity, insight.title, insight.message
        );
    }
    Ok(())
}

/// Hands the warehouse to the web layer and blocks serving requests.
async fn handle_serve(config: &Config, repository: WarehouseRepository) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(
        repository,
        config.insights.clone(),
        Duration::from_secs(config.server.metrics_cache_ttl_secs),
    ));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    web_server::run_server(addr, state).await
}
