pub mod enums;
pub mod structs;
pub mod time;

// Re-export the core types to provide a clean public API.
pub use enums::PipelineStage;
pub use structs::{CommodityQuote, SalesRecord};
pub use time::parse_source_timestamp;
