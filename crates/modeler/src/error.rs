use thiserror::Error;

/// Defines the errors that can occur while building the gold layer.
#[derive(Error, Debug)]
pub enum GoldError {
    #[error("The silver layer is empty; run the transform stage first.")]
    EmptySilver,

    #[error(transparent)]
    Db(#[from] database::DbError),
}
