use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Column error: {0}")]
    Column(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::error::PolarsError> for CanonError {
    fn from(err: polars::error::PolarsError) -> Self {
        CanonError::Polars(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CanonError>;
