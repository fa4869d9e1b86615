//! Error types for chm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Invalid connection settings (D003)
    #[error("[D003] Invalid connection settings: {0}")]
    InvalidSettings(String),

    /// Server returned a result that could not be decoded (D004)
    #[error("[D004] Malformed query result: {0}")]
    MalformedResult(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<reqwest::Error> for DbError {
    fn from(err: reqwest::Error) -> Self {
        // Transport failures never reached the server; everything else did.
        if err.is_connect() || err.is_timeout() || err.is_builder() {
            DbError::ConnectionError(err.to_string())
        } else {
            DbError::ExecutionError(err.to_string())
        }
    }
}
