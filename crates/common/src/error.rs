use thiserror::Error;

/// Prefix carried by every runtime evaluation failure.
pub const EVALUATION_ERROR_PREFIX: &str = "Error during expression evaluation: ";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InvalidSyntax(String),

    #[error("Error during expression evaluation: {0}")]
    Evaluation(String),

    #[error("Expression not found for ID: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn invalid_syntax(message: impl Into<String>) -> Self {
        Error::InvalidSyntax(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
