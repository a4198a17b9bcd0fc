use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A single daily commodity observation captured from the market-data feed.
///
/// This is the unit the bronze layer snapshots to disk and the silver layer
/// uses to enrich every sales row with macro context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityQuote {
    /// Stable identifier for the series, e.g. "brent_crude".
    pub indicator: String,
    /// Latest daily close for the instrument.
    pub price: Decimal,
    /// ISO currency code the price is quoted in.
    pub currency: String,
    /// Which upstream produced the observation, e.g. "yahoo_finance".
    pub source: String,
    /// When the extractor collected the observation.
    pub collected_at: DateTime<Utc>,
}

impl CommodityQuote {
    /// The price as it enters the warehouse: rounded to cents, as f64.
    /// All downstream aggregation happens in floating point.
    pub fn warehouse_price(&self) -> f64 {
        self.price.round_dp(2).to_f64().unwrap_or_default()
    }
}

/// One cleaned sales order line in the canonical (silver) schema.
///
/// Field nullability mirrors the cleaning rules: descriptive columns that the
/// transformer fills with placeholders are plain `String`s, everything that
/// can legitimately stay unknown is an `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    // Product
    pub category: String,
    pub product_name: String,

    // Customer geography
    pub customer_city: Option<String>,
    pub customer_state: String,
    pub customer_country: String,

    // Order destination geography
    pub order_city: Option<String>,
    pub order_state: Option<String>,
    pub order_country: Option<String>,
    pub order_region: Option<String>,

    // Logistics
    pub delivery_status: Option<String>,
    pub shipping_mode: Option<String>,
    pub shipping_days_actual: i64,
    pub shipping_days_scheduled: i64,

    // Timeline (source timestamps carry no timezone)
    pub order_date: Option<NaiveDateTime>,
    pub shipping_date: Option<NaiveDateTime>,

    // Measures
    pub sale_amount: f64,
    pub order_profit: Option<f64>,
    pub sales_per_customer: Option<f64>,
    pub benefit_per_order: Option<f64>,

    /// Daily commodity close the row was enriched with (0.0 when the feed
    /// snapshot was unavailable for the run).
    pub brent_price: f64,

    // Natural keys from the source system
    pub source_order_id: Option<i64>,
    pub source_product_id: Option<i64>,
    pub source_customer_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn warehouse_price_rounds_to_cents() {
        let quote = CommodityQuote {
            indicator: "brent_crude".to_string(),
            price: dec!(68.1272),
            currency: "USD".to_string(),
            source: "yahoo_finance".to_string(),
            collected_at: Utc::now(),
        };
        assert_eq!(quote.warehouse_price(), 68.13);
    }
}
