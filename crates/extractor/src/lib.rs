//! # Strata Extractor Crate
//!
//! The bronze layer of the pipeline: immutable raw snapshots of everything
//! the system ingests. Two extractors live here. One copies the bundled
//! retail dataset, the other captures the daily commodity quote from the
//! market-data feed.
//!
//! Bronze makes no judgment about content. Cleaning, typing and quality
//! checks belong to the silver transformer; this crate only guarantees that
//! whatever was ingested can be re-read later exactly as it arrived.

pub mod dataset;
pub mod error;
pub mod quote;

// Re-export the key components to create a clean, public-facing API.
pub use dataset::{DatasetExtractor, dataset_snapshot_path};
pub use error::BronzeError;
pub use quote::{QUOTE_SNAPSHOT_FILE, QuoteExtractor, load_quote_snapshot, quote_snapshot_path};
