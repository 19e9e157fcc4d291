use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinmetricsError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, FinmetricsError>;
