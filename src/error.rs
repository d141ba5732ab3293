//! Error types for planlock.
//!
//! Uses thiserror for derive macros. Logical conflicts (`LockExists`,
//! `LockNotFound`) are ordinary variants so callers can treat them as
//! expected outcomes rather than failures.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for planlock operations.
#[derive(Error, Debug)]
pub enum PlanLockError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// A storage key could not be built or parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The storage engine failed or aborted a transaction.
    #[error("db transaction failed: {0}")]
    StorageError(String),

    /// A stored record could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The database file is held by another process.
    #[error("database is locked: {0}")]
    DatabaseLocked(String),

    /// A lock already exists where a new one was requested.
    #[error("lock already exists: {0}")]
    LockExists(String),

    /// No lock exists where one was expected.
    #[error("no lock exists: {0}")]
    LockNotFound(String),
}

impl PlanLockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PlanLockError::UserError(_) => exit_codes::USER_ERROR,
            PlanLockError::InvalidKey(_) => exit_codes::USER_ERROR,
            PlanLockError::LockNotFound(_) => exit_codes::USER_ERROR,
            PlanLockError::StorageError(_) => exit_codes::STORAGE_FAILURE,
            PlanLockError::SerializationError(_) => exit_codes::DATA_FAILURE,
            PlanLockError::DatabaseLocked(_) => exit_codes::LOCK_FAILURE,
            PlanLockError::LockExists(_) => exit_codes::LOCK_FAILURE,
        }
    }

    /// Whether this is a logical conflict rather than an infrastructure failure.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            PlanLockError::LockExists(_) | PlanLockError::LockNotFound(_)
        )
    }
}

impl From<rusqlite::Error> for PlanLockError {
    fn from(err: rusqlite::Error) -> Self {
        PlanLockError::StorageError(err.to_string())
    }
}

/// Result type alias for planlock operations.
pub type Result<T> = std::result::Result<T, PlanLockError>;
