//! Configuration file support for the CLI.
//!
//! Loads and saves CLI configuration from TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use widerow_common::{
    DriverConfig, EngineConfig, DEFAULT_COLUMN_FAMILY, DEFAULT_FETCH_LIMIT,
    DEFAULT_SLOW_OPERATION_THRESHOLD_MS,
};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Data directory of the persistent engine.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Column family commands operate on.
    #[serde(default = "default_column_family")]
    pub column_family: String,

    /// Default output format.
    #[serde(default = "default_format")]
    pub output_format: String,

    /// Print operation timings after each command.
    #[serde(default)]
    pub timing: bool,

    /// Limit used by `get` when none is given.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Operations slower than this are logged as warnings.
    #[serde(default = "default_slow_operation_threshold_ms")]
    pub slow_operation_threshold_ms: u64,

    /// Flush the journal after every write.
    #[serde(default)]
    pub sync_on_commit: bool,

    /// Refuse `put` batches that also drop the row.
    #[serde(default)]
    pub reject_drop_with_insert: bool,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("./data"), |d| d.join("widerow"))
}

fn default_column_family() -> String {
    DEFAULT_COLUMN_FAMILY.to_string()
}

fn default_format() -> String {
    "table".to_string()
}

fn default_limit() -> u32 {
    DEFAULT_FETCH_LIMIT
}

fn default_slow_operation_threshold_ms() -> u64 {
    DEFAULT_SLOW_OPERATION_THRESHOLD_MS
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            column_family: default_column_family(),
            output_format: default_format(),
            timing: false,
            default_limit: default_limit(),
            slow_operation_threshold_ms: default_slow_operation_threshold_ms(),
            sync_on_commit: false,
            reject_drop_with_insert: false,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Loads the default configuration file.
    ///
    /// Looks in the following locations:
    /// 1. ~/.config/widerow/config.toml
    /// 2. ~/.widerow/config.toml
    /// 3. Returns default if not found
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".widerow").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Returns the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("widerow").join("config.toml"))
    }

    /// Engine configuration with the selected column family opened.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            data_dir: self.data_dir.clone(),
            memory_mode: false,
            column_families: vec![self.column_family.clone()],
            sync_on_commit: self.sync_on_commit,
        }
    }

    /// Driver configuration for the selected column family.
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig::new(self.column_family.clone())
            .reject_drop_with_insert(self.reject_drop_with_insert)
            .slow_operation_threshold(Duration::from_millis(self.slow_operation_threshold_ms))
    }
}
