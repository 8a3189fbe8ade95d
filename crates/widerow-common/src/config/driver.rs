//! Driver configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{DEFAULT_COLUMN_FAMILY, DEFAULT_SLOW_OPERATION_THRESHOLD_MS};
use crate::error::{ConfigError, ConfigResult};

/// Configuration for a wide-row driver bound to one column family.
///
/// # Example
///
/// ```rust
/// use widerow_common::config::DriverConfig;
///
/// let config = DriverConfig::new("events").reject_drop_with_insert(true);
/// assert_eq!(config.column_family, "events");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Column family every request is addressed to.
    #[serde(default = "default_column_family")]
    pub column_family: String,

    /// Fail an update that both drops the row and inserts columns instead of
    /// passing both to the engine.
    /// Default: false
    #[serde(default)]
    pub reject_drop_with_insert: bool,

    /// Operations slower than this are logged at `warn` by the timing hook.
    /// Default: 500
    #[serde(default = "default_slow_operation_threshold_ms")]
    pub slow_operation_threshold_ms: u64,
}

fn default_column_family() -> String {
    DEFAULT_COLUMN_FAMILY.to_string()
}

fn default_slow_operation_threshold_ms() -> u64 {
    DEFAULT_SLOW_OPERATION_THRESHOLD_MS
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            column_family: default_column_family(),
            reject_drop_with_insert: false,
            slow_operation_threshold_ms: default_slow_operation_threshold_ms(),
        }
    }
}

impl DriverConfig {
    /// Creates a configuration for the given column family.
    #[must_use]
    pub fn new(column_family: impl Into<String>) -> Self {
        Self {
            column_family: column_family.into(),
            ..Default::default()
        }
    }

    /// Sets whether drop-with-insert updates are rejected.
    #[must_use]
    pub fn reject_drop_with_insert(mut self, reject: bool) -> Self {
        self.reject_drop_with_insert = reject;
        self
    }

    /// Sets the slow-operation threshold.
    #[must_use]
    pub fn slow_operation_threshold(mut self, threshold: Duration) -> Self {
        self.slow_operation_threshold_ms = u64::try_from(threshold.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Returns the slow-operation threshold as a [`Duration`].
    #[must_use]
    pub const fn slow_operation_threshold_duration(&self) -> Duration {
        Duration::from_millis(self.slow_operation_threshold_ms)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.column_family.is_empty() {
            return Err(ConfigError::Empty {
                field: "column_family",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.column_family, "default");
        assert!(!config.reject_drop_with_insert);
        assert_eq!(
            config.slow_operation_threshold_duration(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = DriverConfig::new("users")
            .reject_drop_with_insert(true)
            .slow_operation_threshold(Duration::from_millis(20));

        assert_eq!(config.column_family, "users");
        assert!(config.reject_drop_with_insert);
        assert_eq!(config.slow_operation_threshold_ms, 20);
    }

    #[test]
    fn test_validate_rejects_empty_column_family() {
        let config = DriverConfig::new("");
        assert_eq!(
            config.validate(),
            Err(ConfigError::Empty {
                field: "column_family"
            })
        );
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let config: DriverConfig = toml::from_str(r#"column_family = "events""#).unwrap();
        assert_eq!(config.column_family, "events");
        assert!(!config.reject_drop_with_insert);
        assert_eq!(config.slow_operation_threshold_ms, 500);
    }
}
