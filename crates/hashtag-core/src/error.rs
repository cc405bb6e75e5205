use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Failures raised inside a data source are passed through untouched.
    #[error(transparent)]
    DataSource(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
