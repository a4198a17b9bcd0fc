//! # Strata Modeler Crate
//!
//! The gold layer: rebuilds the analytical star schema (five dimensions and
//! one fact table) from the cleaned silver table.
//!
//! ## Architectural Principles
//!
//! - **Full rebuild:** every run clears and repopulates the whole schema.
//!   There is no incremental path, so surrogate keys are only stable within
//!   a single build.
//! - **Facts are never dropped:** dimension lookups are LEFT JOINs. A silver
//!   row that misses a dimension lands in the fact table with a NULL key
//!   instead of disappearing from the totals.
//!
//! ## Public API
//!
//! - `GoldBuilder`: drives one star-schema build and records it in the
//!   build manifest.
//! - `GoldSummary`: per-table row counts plus the fact-table totals.

use core_types::PipelineStage;
use database::{FactTotals, TableCount, WarehouseRepository};
use serde::Serialize;
use tracing::{info, warn};

pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use error::GoldError;

/// What one gold build produced: row counts per table in build order, plus
/// the integrity totals over the fact table.
#[derive(Debug, Clone, Serialize)]
pub struct GoldSummary {
    pub run_id: String,
    pub tables: Vec<TableCount>,
    pub fact: FactTotals,
}

impl GoldSummary {
    /// Row count for one table, if it was part of the build.
    pub fn rows_for(&self, table: &str) -> Option<i64> {
        self.tables
            .iter()
            .find(|count| count.table_name == table)
            .map(|count| count.row_count)
    }
}

/// Rebuilds the star schema from `silver_sales` and writes the manifest.
pub struct GoldBuilder {
    repository: WarehouseRepository,
}

impl GoldBuilder {
    pub fn new(repository: WarehouseRepository) -> Self {
        Self { repository }
    }

    /// Runs one full rebuild. Refuses to run against an empty silver layer,
    /// since that would silently truncate every gold table.
    pub async fn build(&self, run_id: &str) -> Result<GoldSummary, GoldError> {
        let silver_rows = self.repository.silver_row_count().await?;
        if silver_rows == 0 {
            return Err(GoldError::EmptySilver);
        }

        let tables = self.repository.rebuild_gold().await?;
        self.repository
            .record_builds(run_id, PipelineStage::Gold, &tables)
            .await?;

        let fact = self.repository.fact_totals().await?;
        // LEFT JOINs mean the fact table must carry every silver row; a
        // mismatch points at a dimension join fanning out.
        if fact.row_count != silver_rows {
            warn!(
                silver_rows,
                fact_rows = fact.row_count,
                "fact table row count diverged from silver"
            );
        }
        info!(
            run_id,
            fact_rows = fact.row_count,
            total_sales = fact.total_sales,
            "gold layer rebuilt"
        );

        Ok(GoldSummary {
            run_id: run_id.to_string(),
            tables,
            fact,
        })
    }
}
