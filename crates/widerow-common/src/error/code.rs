//! Error codes and configuration errors.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Unknown or unspecified error.
    Unknown = 0x0000,
    /// Internal error (bug).
    Internal = 0x0001,
    /// Invalid argument provided.
    InvalidArgument = 0x0003,
    /// Operation timed out.
    Timeout = 0x0004,
    /// Invalid configuration.
    InvalidConfig = 0x0006,

    // Engine errors (0x0100 - 0x01FF)
    /// Engine is unreachable or shut down.
    Unavailable = 0x0100,
    /// Column family does not exist.
    ColumnFamilyNotFound = 0x0101,
    /// Column range is malformed.
    InvalidRange = 0x0102,
    /// Request rejected by the engine.
    InvalidRequest = 0x0103,
    /// Storage backend failure.
    Storage = 0x0104,
    /// I/O failure.
    Io = 0x0105,

    // Codec errors (0x0200 - 0x02FF)
    /// Encoded bytes have the wrong length.
    InvalidLength = 0x0200,
    /// Encoded bytes are not valid UTF-8.
    InvalidUtf8 = 0x0201,
    /// JSON encoding or decoding failed.
    Json = 0x0202,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "Engine",
            0x02 => "Codec",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field has a value outside its accepted domain.
    #[error("invalid {field}: {message}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidConfig
    }
}
