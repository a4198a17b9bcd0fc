use thiserror::Error;

#[derive(Error, Debug)]
pub enum BronzeError {
    #[error("Source dataset not found at '{0}'")]
    MissingSource(String),

    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize the quote snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}
