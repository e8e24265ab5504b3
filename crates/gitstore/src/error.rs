//! Git store error types.

use thiserror::Error;

/// Repository backend operation errors.
#[derive(Debug, Error)]
pub enum GitStoreError {
    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("repository already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{command} failed (status {status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("ignore template error: {0}")]
    Template(String),
}

/// Result type for git store operations.
pub type GitStoreResult<T> = std::result::Result<T, GitStoreError>;
