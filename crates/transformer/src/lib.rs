//! # Strata Transformer Crate
//!
//! The silver layer: turns the raw bronze snapshots into one cleaned,
//! canonical flat table enriched with daily commodity context.
//!
//! ## Architectural Principles
//!
//! - **Report, then filter:** quality violations are counted on the full
//!   parsed set before the survival filter runs, so dropped rows still show
//!   up in the audit.
//! - **Coerce, don't crash:** bad timestamps become NULLs, bad amounts fail
//!   the survival filter, malformed CSV records are skipped and counted. The
//!   only fatal inputs are a missing snapshot or a missing required column.
//!
//! ## Public API
//!
//! - `SilverTransformer`: drives one silver build end to end.
//! - `SilverOutcome`: the figures a build reports back.
//! - `QualityAuditor` / `QualityReport`: the data-quality audit.

use chrono::Local;
use database::{SilverSummary, WarehouseRepository};
use extractor::{dataset_snapshot_path, load_quote_snapshot};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod error;
pub mod quality;
pub mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use error::SilverError;
pub use quality::{FillCounts, QualityAuditor, QualityReport};
pub use schema::{FALLBACK_CATEGORY, FALLBACK_COUNTRY, FALLBACK_PRODUCT, FALLBACK_STATE};

/// End-of-run figures for one silver build.
#[derive(Debug, Clone, Serialize)]
pub struct SilverOutcome {
    pub rows_scanned: usize,
    pub rows_skipped_malformed: usize,
    pub rows_filtered: usize,
    pub rows_loaded: u64,
    /// The commodity price every surviving row was enriched with.
    pub brent_price: f64,
    pub quality: QualityReport,
    pub summary: SilverSummary,
}

/// Drives one silver build: quote snapshot → CSV parse → quality audit →
/// survival filter → warehouse load.
pub struct SilverTransformer {
    repository: WarehouseRepository,
    bronze_dir: PathBuf,
    dataset_source: PathBuf,
}

impl SilverTransformer {
    pub fn new(
        repository: WarehouseRepository,
        bronze_dir: impl Into<PathBuf>,
        dataset_source: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository,
            bronze_dir: bronze_dir.into(),
            dataset_source: dataset_source.into(),
        }
    }

    /// The bronze CSV snapshot this build reads.
    pub fn snapshot_path(&self) -> PathBuf {
        dataset_snapshot_path(&self.bronze_dir, &self.dataset_source)
    }

    pub async fn run(&self) -> Result<SilverOutcome, SilverError> {
        self.run_with_progress(&mut |_| {}).await
    }

    /// Same as [`run`](Self::run); `on_record` fires once per raw CSV record
    /// so callers can drive a progress bar.
    pub async fn run_with_progress(
        &self,
        on_record: &mut dyn FnMut(usize),
    ) -> Result<SilverOutcome, SilverError> {
        // 1. Macro context from the latest quote snapshot. A missing or
        //    unreadable snapshot degrades to a zero price.
        let brent_price = match load_quote_snapshot(&self.bronze_dir).await {
            Some(quote) => {
                let price = quote.warehouse_price();
                info!(indicator = %quote.indicator, price, "enriching with commodity context");
                price
            }
            None => {
                warn!("no quote snapshot found; enriching with a zero commodity price");
                0.0
            }
        };

        // 2. Parse the raw snapshot into canonical rows.
        let snapshot = self.snapshot_path();
        if !snapshot.is_file() {
            return Err(SilverError::MissingSnapshot(snapshot.display().to_string()));
        }
        let parsed = schema::parse_dataset(&snapshot, brent_price, on_record)?;
        if parsed.skipped_malformed > 0 {
            warn!(
                count = parsed.skipped_malformed,
                "malformed CSV records skipped"
            );
        }

        // 3. Audit before filtering, so dropped rows still appear.
        let quality = QualityAuditor::audit(
            &parsed.records,
            Local::now().naive_local(),
            parsed.fills,
        );
        quality.log();

        // 4. Survival filter: aggregation needs a non-negative sale amount.
        //    NaN amounts (unparseable) fail the comparison as well.
        let mut records = parsed.records;
        let before = records.len();
        records.retain(|record| record.sale_amount >= 0.0);
        let rows_filtered = before - records.len();

        // 5. Replace the silver table and summarize.
        let rows_loaded = self.repository.replace_silver_rows(&records).await?;
        let summary = self.repository.silver_summary().await?;
        info!(
            rows = summary.row_count,
            countries = summary.distinct_countries,
            categories = summary.distinct_categories,
            cities = summary.distinct_cities,
            "silver layer rebuilt"
        );

        Ok(SilverOutcome {
            rows_scanned: parsed.scanned,
            rows_skipped_malformed: parsed.skipped_malformed,
            rows_filtered,
            rows_loaded,
            brent_price,
            quality,
            summary,
        })
    }
}

/// Convenience used by callers that already know the snapshot location.
pub fn snapshot_for(bronze_dir: &Path, dataset_source: &Path) -> PathBuf {
    dataset_snapshot_path(bronze_dir, dataset_source)
}
