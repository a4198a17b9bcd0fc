use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level envelope of the Yahoo Finance chart API
/// (`/v8/finance/chart/{symbol}`). Exactly one of `result` / `error` is
/// populated.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

/// One instrument's chart payload. Only the meta block is used: for a
/// `range=1d` request, `regularMarketPrice` is the latest daily close.
#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<Decimal>,
    /// Unix seconds of the price observation, as reported by the exchange.
    #[serde(default)]
    pub regular_market_time: Option<i64>,
}

/// Error payload the chart API returns for unknown or delisted symbols.
#[derive(Debug, Deserialize)]
pub struct ChartApiError {
    pub code: String,
    pub description: String,
}
