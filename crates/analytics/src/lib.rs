//! # Strata Analytics Crate
//!
//! This crate turns the analytical working set into KPIs and narrative
//! insight cards. It acts as the "unbiased judge" of the warehouse: the same
//! numbers back the CLI report and the web API.
//!
//! ## Architectural Principles
//!
//! - **Stateless Calculation:** The `MetricsEngine` is a stateless
//!   calculator. It takes warehouse rows as input and produces a
//!   `MetricsReport` as output. This makes it highly reliable and easy to
//!   test.
//! - **Configured Benchmarks:** The `InsightEngine` carries no business
//!   constants of its own; every threshold comes from the `[insights]`
//!   configuration section.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The main struct that contains the calculation logic.
//! - `MetricsReport`: The standardized struct that holds all KPI values.
//! - `InsightEngine` / `Insight`: The rule-based narrative layer.
//! - `AnalyticsError`: The specific error types that can be returned from
//!   this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod insight;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{LATE_DELIVERY_STATUS, MetricsEngine};
pub use error::AnalyticsError;
pub use insight::{Insight, InsightEngine, Severity};
pub use report::MetricsReport;
