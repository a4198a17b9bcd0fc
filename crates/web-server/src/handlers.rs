use crate::{AppState, error::AppError};
use analytics::{Insight, MetricsReport};
use axum::{
    Json,
    extract::{Query, State},
};
use database::{CategoryKpi, DeliveryStatusCount};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    10
}

/// # GET /api/metrics
/// The full KPI report, served from the TTL cache.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsReport>, AppError> {
    let (report, _insights) = state.metrics().await?;
    Ok(Json(report))
}

/// # GET /api/insights
/// The narrative cards derived from the same cached report.
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let (_report, insights) = state.metrics().await?;
    Ok(Json(insights))
}

/// # GET /api/categories?limit=10
/// Top categories by revenue, straight from the warehouse.
pub async fn get_category_performance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<CategoryKpi>>, AppError> {
    let rows = state.repository.category_performance(query.limit).await?;
    Ok(Json(rows))
}

/// # GET /api/delivery-status
/// Order volume per delivery status.
pub async fn get_delivery_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeliveryStatusCount>>, AppError> {
    let rows = state.repository.delivery_status_breakdown().await?;
    Ok(Json(rows))
}
