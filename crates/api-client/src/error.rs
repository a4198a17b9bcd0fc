use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP request: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("The quote API returned an error: {0}")]
    QuoteApi(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("The API response is missing expected data: {0}")]
    MissingData(String),
}
