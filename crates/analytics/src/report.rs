use serde::{Deserialize, Serialize};

/// A comprehensive, standardized snapshot of the warehouse KPIs.
///
/// This struct is the final output of the `MetricsEngine` and serves as the
/// data transfer object for analytical results throughout the entire system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    // I. Core Revenue Metrics
    pub total_revenue: f64,
    pub total_profit: f64,
    /// Profit over revenue in percent; 0 when revenue is not positive.
    pub margin_pct: f64,
    pub order_count: usize,
    pub average_ticket: f64,

    // II. Commodity Context
    pub brent_average: f64,
    /// Sample standard deviation of the enriched price; 0 with fewer than
    /// two observations.
    pub brent_volatility: f64,

    // III. Logistics
    pub late_delivery_rate_pct: f64,
    pub on_time_rate_pct: f64,

    // IV. Momentum and Mix
    /// Revenue of the later half of the date-ordered rows against the
    /// earlier half, in percent.
    pub sales_trend_pct: f64,
    pub top_category: Option<String>,    // highest revenue
    pub weakest_category: Option<String>, // lowest total profit
}

impl MetricsReport {
    /// Creates a new, zeroed-out MetricsReport.
    /// This is useful as a default or starting point before calculations.
    pub fn new() -> Self {
        Self {
            total_revenue: 0.0,
            total_profit: 0.0,
            margin_pct: 0.0,
            order_count: 0,
            average_ticket: 0.0,
            brent_average: 0.0,
            brent_volatility: 0.0,
            late_delivery_rate_pct: 0.0,
            on_time_rate_pct: 0.0,
            sales_trend_pct: 0.0,
            top_category: None,
            weakest_category: None,
        }
    }
}

impl Default for MetricsReport {
    fn default() -> Self {
        Self::new()
    }
}
