//! Storage engine configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::DEFAULT_COLUMN_FAMILY;
use crate::error::{ConfigError, ConfigResult};

/// Configuration for opening a storage engine.
///
/// # Example
///
/// ```rust
/// use widerow_common::config::EngineConfig;
///
/// let config = EngineConfig::with_data_dir("/var/lib/widerow");
/// assert!(!config.memory_mode);
/// assert_eq!(config.column_families, vec!["default".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Data directory for persistent storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Keep everything in memory (nothing is persisted).
    #[serde(default)]
    pub memory_mode: bool,

    /// Column families opened (or created) at startup.
    #[serde(default = "default_column_families")]
    pub column_families: Vec<String>,

    /// Flush the journal to disk after every committed batch.
    /// Default: false
    #[serde(default)]
    pub sync_on_commit: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_column_families() -> Vec<String> {
    vec![DEFAULT_COLUMN_FAMILY.to_string()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            memory_mode: false,
            column_families: default_column_families(),
            sync_on_commit: false,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with the specified data directory.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Creates an in-memory configuration for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            memory_mode: true,
            ..Default::default()
        }
    }

    /// Adds a column family to open at startup.
    #[must_use]
    pub fn column_family(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.column_families.contains(&name) {
            self.column_families.push(name);
        }
        self
    }

    /// Sets whether every commit is flushed to disk.
    #[must_use]
    pub fn sync_on_commit(mut self, sync: bool) -> Self {
        self.sync_on_commit = sync;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.column_families.is_empty() {
            return Err(ConfigError::Empty {
                field: "column_families",
            });
        }

        if let Some(name) = self.column_families.iter().find(|name| !is_valid_name(name)) {
            return Err(ConfigError::Invalid {
                field: "column_families",
                message: format!("'{name}' may only contain ASCII letters, digits, '_' and '-'"),
            });
        }

        if !self.memory_mode && self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty { field: "data_dir" });
        }

        Ok(())
    }
}

/// Column family names double as on-disk partition names.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
