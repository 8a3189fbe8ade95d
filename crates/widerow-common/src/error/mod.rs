//! Error handling for widerow.
//!
//! Each component owns its own error enum; this module provides the stable
//! [`ErrorCode`] those enums map onto, plus the configuration error shared by
//! every configuration structure.

mod code;

pub use code::{ConfigError, ErrorCode};

/// Result type alias for configuration validation.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
