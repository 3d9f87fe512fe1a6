//! Error types for mdlex.

use thiserror::Error;

/// Core error type for mdlex operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported value for key '{key}': {reason}")]
    UnsupportedValue { key: String, reason: String },
}

/// Result type alias using mdlex's Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
