//! Key handling error types.

use thiserror::Error;

/// Errors from parsing or using authorized keys.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key parsing error: {0}")]
    Parsing(String),

    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Result type for key operations.
pub type KeyResult<T> = std::result::Result<T, KeyError>;
