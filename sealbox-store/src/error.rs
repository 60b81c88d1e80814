//! Error types for the encrypted user store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated on write
    #[error("conflict: record already exists")]
    Conflict,

    /// Requested record does not exist
    #[error("not found")]
    NotFound,

    /// Request failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Crypto failure during encrypt-on-write
    #[error(transparent)]
    Crypto(#[from] sealbox::error::Error),

    /// Underlying storage driver failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Conflict
            }
            other => Self::Internal(other.to_string()),
        }
    }
}
