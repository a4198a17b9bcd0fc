use crate::error::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use configuration::settings::MarketDataConfig;
use core_types::CommodityQuote;
use std::time::Duration;

pub mod error;
pub mod responses;
// --- Public API ---
pub use error::ApiError as MarketDataError;
pub use responses::{ChartApiError, ChartMeta, ChartResponse};

/// The quote API rejects requests without a browser-looking user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// The generic, abstract interface for a daily market-data feed.
/// This trait is the contract the bronze extractor works against, allowing
/// the underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches the latest daily quote for the given instrument symbol.
    async fn fetch_daily_quote(&self, symbol: &str) -> Result<CommodityQuote, ApiError>;
}

/// A concrete implementation of the `MarketDataClient` for the Yahoo Finance
/// chart API, which serves daily commodity futures quotes unauthenticated.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new(config: &MarketDataConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build reqwest client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Stable series label for the instruments we track; unknown symbols pass
/// through verbatim.
fn indicator_label(symbol: &str) -> &str {
    match symbol {
        "BZ=F" => "brent_crude",
        other => other,
    }
}

#[async_trait]
impl MarketDataClient for YahooFinanceClient {
    async fn fetch_daily_quote(&self, symbol: &str) -> Result<CommodityQuote, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::QuoteApi(format!(
                "HTTP {} from chart API: {}",
                status, text
            )));
        }

        let parsed: ChartResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        if let Some(api_error) = parsed.chart.error {
            return Err(ApiError::QuoteApi(format!(
                "{}: {}",
                api_error.code, api_error.description
            )));
        }

        let result = parsed
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| ApiError::MissingData(format!("no chart result for {}", symbol)))?;

        let price = result
            .meta
            .regular_market_price
            .ok_or_else(|| ApiError::MissingData(format!("no market price for {}", symbol)))?;

        Ok(CommodityQuote {
            indicator: indicator_label(symbol).to_string(),
            price,
            currency: result.meta.currency.unwrap_or_else(|| "USD".to_string()),
            source: "yahoo_finance".to_string(),
            collected_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brent_futures_symbol_maps_to_series_label() {
        assert_eq!(indicator_label("BZ=F"), "brent_crude");
        assert_eq!(indicator_label("CL=F"), "CL=F");
    }
}
