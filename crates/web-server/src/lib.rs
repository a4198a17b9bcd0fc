use analytics::{Insight, InsightEngine, MetricsEngine, MetricsReport};
use axum::{Router, routing::get};
use configuration::InsightConfig;
use database::WarehouseRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

use error::AppError;

/// A computed report plus the moment it was computed.
struct CachedReport {
    report: MetricsReport,
    insights: Vec<Insight>,
    computed_at: Instant,
}

/// The shared application state that all handlers can access.
///
/// Metrics and insights are recomputed at most once per TTL window; within
/// the window every request is served from the cached copy.
pub struct AppState {
    pub repository: WarehouseRepository,
    insight_engine: InsightEngine,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedReport>>,
}

impl AppState {
    pub fn new(
        repository: WarehouseRepository,
        thresholds: InsightConfig,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            insight_engine: InsightEngine::new(thresholds),
            cache_ttl,
            cache: RwLock::new(None),
        }
    }

    /// The cached report when fresh, recomputed from the warehouse otherwise.
    pub async fn metrics(&self) -> Result<(MetricsReport, Vec<Insight>), AppError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.computed_at.elapsed() < self.cache_ttl {
                    return Ok((cached.report.clone(), cached.insights.clone()));
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if cached.computed_at.elapsed() < self.cache_ttl {
                return Ok((cached.report.clone(), cached.insights.clone()));
            }
        }

        let rows = self.repository.fetch_analytical_rows().await?;
        let report = MetricsEngine::new().calculate(&rows)?;
        let insights = self.insight_engine.generate(&report);
        tracing::info!(
            orders = report.order_count,
            revenue = report.total_revenue,
            "metrics report recomputed"
        );
        *cache = Some(CachedReport {
            report: report.clone(),
            insights: insights.clone(),
            computed_at: Instant::now(),
        });
        Ok((report, insights))
    }
}

/// Builds the application router with its middleware stack.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/insights", get(handlers::get_insights))
        .route("/api/categories", get(handlers::get_category_performance))
        .route("/api/delivery-status", get(handlers::get_delivery_status))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every
        // incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let router = app(state);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use chrono::NaiveDate;
    use core_types::SalesRecord;
    use database::{connect_in_memory, run_migrations};

    fn record(category: &str, status: &str, sale: f64, profit: f64) -> SalesRecord {
        SalesRecord {
            category: category.to_string(),
            product_name: format!("{category} item"),
            customer_city: Some("Caguas".to_string()),
            customer_state: "PR".to_string(),
            customer_country: "Puerto Rico".to_string(),
            order_city: None,
            order_state: None,
            order_country: None,
            order_region: None,
            delivery_status: Some(status.to_string()),
            shipping_mode: Some("Standard Class".to_string()),
            shipping_days_actual: 5,
            shipping_days_scheduled: 4,
            order_date: NaiveDate::from_ymd_opt(2018, 1, 13)
                .unwrap()
                .and_hms_opt(12, 0, 0),
            shipping_date: None,
            sale_amount: sale,
            order_profit: Some(profit),
            sales_per_customer: Some(sale),
            benefit_per_order: Some(profit),
            brent_price: 68.13,
            source_order_id: Some(1),
            source_product_id: Some(2),
            source_customer_id: Some(3),
        }
    }

    async fn seeded_state(ttl: Duration) -> Arc<AppState> {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = WarehouseRepository::new(pool);

        let rows = vec![
            record("Fitness", "Shipping on time", 400.0, 100.0),
            record("Golf", "Late delivery", 100.0, 10.0),
        ];
        repo.replace_silver_rows(&rows).await.unwrap();
        repo.rebuild_gold().await.unwrap();

        Arc::new(AppState::new(repo, InsightConfig::default(), ttl))
    }

    #[tokio::test]
    async fn metrics_handler_serves_the_computed_report() {
        let state = seeded_state(Duration::from_secs(3600)).await;

        let Json(report) = handlers::get_metrics(State(state.clone())).await.unwrap();
        assert_eq!(report.order_count, 2);
        assert_eq!(report.total_revenue, 500.0);
        assert_eq!(report.late_delivery_rate_pct, 50.0);

        let Json(insights) = handlers::get_insights(State(state)).await.unwrap();
        // Margin is 22%: healthy. Late rate 50%: crisis.
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].title, "Healthy Margin");
        assert_eq!(insights[1].title, "Logistics Crisis");
    }

    #[tokio::test]
    async fn category_and_status_handlers_query_the_warehouse() {
        let state = seeded_state(Duration::from_secs(3600)).await;

        let Json(categories) = handlers::get_category_performance(
            State(state.clone()),
            Query(handlers::CategoryQuery { limit: 1 }),
        )
        .await
        .unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category, "Fitness");
        assert_eq!(categories[0].total_revenue, 400.0);

        let Json(statuses) = handlers::get_delivery_status(State(state)).await.unwrap();
        assert_eq!(statuses.len(), 2);
    }

    #[tokio::test]
    async fn fresh_cache_ignores_warehouse_changes() {
        let state = seeded_state(Duration::from_secs(3600)).await;
        let (first, _insights) = state.metrics().await.unwrap();

        state
            .repository
            .replace_silver_rows(&[record("Fitness", "Shipping on time", 9999.0, 1.0)])
            .await
            .unwrap();
        state.repository.rebuild_gold().await.unwrap();

        let (second, _insights) = state.metrics().await.unwrap();
        assert_eq!(first.total_revenue, second.total_revenue);
    }

    #[tokio::test]
    async fn expired_cache_recomputes() {
        let state = seeded_state(Duration::from_secs(0)).await;
        let (first, _insights) = state.metrics().await.unwrap();
        assert_eq!(first.total_revenue, 500.0);

        state
            .repository
            .replace_silver_rows(&[record("Fitness", "Shipping on time", 9999.0, 1.0)])
            .await
            .unwrap();
        state.repository.rebuild_gold().await.unwrap();

        let (second, _insights) = state.metrics().await.unwrap();
        assert_eq!(second.total_revenue, 9999.0);
    }

    #[tokio::test]
    async fn empty_warehouse_maps_to_not_found() {
        let pool = connect_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let state = Arc::new(AppState::new(
            WarehouseRepository::new(pool),
            InsightConfig::default(),
            Duration::from_secs(3600),
        ));

        let err = handlers::get_metrics(State(state)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
