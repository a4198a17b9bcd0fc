use thiserror::Error;

#[derive(Error, Debug)]
pub enum SilverError {
    #[error("Bronze snapshot not found at '{0}'; run the extract step first")]
    MissingSnapshot(String),

    #[error("Required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    #[error("Failed to read the dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] database::DbError),
}
