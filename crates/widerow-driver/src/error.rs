//! Error types for the driver.

use thiserror::Error;

use widerow_common::{ConfigError, ErrorCode};
use widerow_engine::EngineError;

use crate::codec::CodecError;

/// Driver error type.
///
/// Engine and codec failures are relayed unchanged; the driver never retries.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The storage engine reported a failure.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// A row key, column name or value could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The request was rejected before reaching the engine.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid driver configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DriverError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DriverError::Engine(e) => e.code(),
            DriverError::Codec(e) => e.code(),
            DriverError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            DriverError::Config(e) => e.code(),
        }
    }

    /// Returns true if the caller may retry the same request.
    ///
    /// Advisory only.
    pub fn is_retryable(&self) -> bool {
        match self {
            DriverError::Engine(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
