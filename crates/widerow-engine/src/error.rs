//! Engine error types.

use thiserror::Error;
use widerow_common::{ConfigError, ErrorCode};

/// Errors reported by a storage engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The column family does not exist.
    #[error("column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// The column range is malformed.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// The request was rejected before touching storage.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The operation did not complete in time.
    #[error("operation timed out after {duration_ms}ms")]
    Timeout {
        /// Elapsed time in milliseconds.
        duration_ms: u64,
    },

    /// The engine cannot be reached.
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The persistent keyspace failed.
    #[error("storage error: {0}")]
    Storage(#[from] fjall::Error),

    /// A stored record could not be decoded.
    #[error("corrupted record: {0}")]
    Corrupted(String),

    /// The engine configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// I/O error from the underlying system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error - this indicates a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::ColumnFamilyNotFound(_) => ErrorCode::ColumnFamilyNotFound,
            EngineError::InvalidRange(_) => ErrorCode::InvalidRange,
            EngineError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            EngineError::Timeout { .. } => ErrorCode::Timeout,
            EngineError::Unavailable(_) => ErrorCode::Unavailable,
            EngineError::Storage(_) | EngineError::Corrupted(_) => ErrorCode::Storage,
            EngineError::Config(_) => ErrorCode::InvalidConfig,
            EngineError::Io(_) => ErrorCode::Io,
            EngineError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Returns true if the same request may succeed when issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Timeout { .. } | EngineError::Unavailable(_)
        )
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        EngineError::Internal(format!("storage task failed: {e}"))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
