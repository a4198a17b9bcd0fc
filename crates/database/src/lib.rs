//! # Strata Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! SQLite warehouse holding the silver and gold layers. It is the system's
//! "permanent archive."
//!
//! ## Architectural Principles
//!
//! - **Storage Adapter:** This crate encapsulates all database-specific
//!   logic. It provides a clean, abstract API to the rest of the application,
//!   hiding the underlying SQL and schema details.
//! - **Embedded Warehouse:** The warehouse is a single SQLite file, so a
//!   fresh checkout runs end to end with no external services.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share a
//!   connection pool (`SqlitePool`).
//!
//! ## Public API
//!
//! - `connect` / `connect_in_memory`: Establish the warehouse connection pool.
//! - `run_migrations`: Applies the schema migrations, ensuring the warehouse
//!   is up-to-date.
//! - `WarehouseRepository`: The main struct that holds the connection pool and
//!   provides all the high-level data access methods (e.g., `rebuild_gold`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod star_schema;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, run_migrations};
pub use error::DbError;
pub use repository::{
    AnalyticalRow, BuildRecord, CategoryKpi, DeliveryStatusCount, FactTotals, SilverSummary,
    TableCount, WarehouseRepository,
};
