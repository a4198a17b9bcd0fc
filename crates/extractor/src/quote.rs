use crate::error::BronzeError;
use api_client::MarketDataClient;
use core_types::CommodityQuote;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the commodity-quote snapshot inside the bronze directory.
pub const QUOTE_SNAPSHOT_FILE: &str = "market_context.json";

pub fn quote_snapshot_path(bronze_dir: &Path) -> PathBuf {
    bronze_dir.join(QUOTE_SNAPSHOT_FILE)
}

/// Captures the daily commodity quote into the bronze layer.
///
/// The feed is best effort: a failed fetch is logged and the pipeline keeps
/// going, leaving the previous snapshot (if any) in place.
pub struct QuoteExtractor<C: MarketDataClient> {
    client: C,
    bronze_dir: PathBuf,
    symbol: String,
}

impl<C: MarketDataClient> QuoteExtractor<C> {
    pub fn new(client: C, bronze_dir: impl Into<PathBuf>, symbol: impl Into<String>) -> Self {
        Self {
            client,
            bronze_dir: bronze_dir.into(),
            symbol: symbol.into(),
        }
    }

    /// Fetches today's quote and writes it as pretty JSON. Returns the quote
    /// when the feed answered, `None` when it did not.
    pub async fn snapshot(&self) -> Result<Option<CommodityQuote>, BronzeError> {
        let quote = match self.client.fetch_daily_quote(&self.symbol).await {
            Ok(quote) => quote,
            Err(error) => {
                warn!(
                    symbol = %self.symbol,
                    %error,
                    "quote feed unavailable; continuing without fresh macro context"
                );
                return Ok(None);
            }
        };

        tokio::fs::create_dir_all(&self.bronze_dir).await?;
        let path = quote_snapshot_path(&self.bronze_dir);
        let json = serde_json::to_string_pretty(&quote)?;
        tokio::fs::write(&path, json).await?;

        info!(
            indicator = %quote.indicator,
            price = %quote.price,
            snapshot = %path.display(),
            "quote snapshot written"
        );
        Ok(Some(quote))
    }
}

/// Reads the quote snapshot left by a previous extract, if one exists and
/// still parses. A corrupt snapshot is treated the same as a missing one.
pub async fn load_quote_snapshot(bronze_dir: &Path) -> Option<CommodityQuote> {
    let path = quote_snapshot_path(bronze_dir);
    let raw = tokio::fs::read_to_string(&path).await.ok()?;
    match serde_json::from_str(&raw) {
        Ok(quote) => Some(quote),
        Err(error) => {
            warn!(snapshot = %path.display(), %error, "ignoring unreadable quote snapshot");
            None
        }
    }
}
