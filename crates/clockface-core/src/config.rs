//! Configuration loading and typed config structures for Clockface.
//!
//! The configuration lives in `clockface-config.yaml` next to the engine
//! binary. This module defines strongly-typed structs mirroring the YAML
//! structure and a loader that reads the file. Every field has a default,
//! so an empty or missing file yields a working configuration.

use std::path::{Path, PathBuf};

use clockface_types::WorldId;
use serde::Deserialize;
use uuid::Uuid;

/// Environment variable that overrides `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "CLOCKFACE_DATA_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Clockface configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClockfaceConfig {
    /// Where the clock registry is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Periodic driver cadence.
    #[serde(default)]
    pub driver: DriverConfig,

    /// Mapping from world time to hand angles.
    #[serde(default)]
    pub dial: DialConfig,

    /// Simulated world settings for the headless engine.
    #[serde(default)]
    pub world: WorldConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClockfaceConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CLOCKFACE_DATA_DIR` overrides `storage.data_dir` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.storage.apply_env_overrides();
        Ok(config)
    }
}

/// Registry storage location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the registry file. Created on first save.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Registry file name inside `data_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl StorageConfig {
    /// Override the data directory from `CLOCKFACE_DATA_DIR` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(val);
        }
    }

    /// Full path of the registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

/// Periodic driver cadence, in host time units (ticks).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverConfig {
    /// Ticks to wait before the first update.
    #[serde(default = "default_initial_delay_ticks")]
    pub initial_delay_ticks: u64,

    /// Ticks between updates.
    #[serde(default = "default_interval_ticks")]
    pub interval_ticks: u64,

    /// Real-time milliseconds per host tick.
    #[serde(default = "default_tick_duration_ms")]
    pub tick_duration_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            initial_delay_ticks: default_initial_delay_ticks(),
            interval_ticks: default_interval_ticks(),
            tick_duration_ms: default_tick_duration_ms(),
        }
    }
}

/// Constants mapping world time onto hand angles.
///
/// Each hand turns once per `period` time units; `offset` shifts where in
/// its turn the hand sits at time 0. The defaults follow a day of 24000
/// units with 1000 units per hour, where time 0 is six o'clock.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DialConfig {
    /// Added to world time before the hour hand's period is applied.
    #[serde(default = "default_hour_offset")]
    pub hour_offset: u64,

    /// Time units per full turn of the hour hand.
    #[serde(default = "default_hour_period")]
    pub hour_period: u64,

    /// Added to world time before the minute hand's period is applied.
    #[serde(default)]
    pub minute_offset: u64,

    /// Time units per full turn of the minute hand.
    #[serde(default = "default_minute_period")]
    pub minute_period: u64,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            hour_offset: default_hour_offset(),
            hour_period: default_hour_period(),
            minute_offset: 0,
            minute_period: default_minute_period(),
        }
    }
}

/// Settings for the in-memory world the headless engine simulates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// World identifier that console-created clocks are placed in.
    #[serde(default = "default_world_id")]
    pub default_world: WorldId,

    /// Time units in one day; world time wraps at this value.
    #[serde(default = "default_day_length")]
    pub day_length: u64,

    /// World time at startup.
    #[serde(default)]
    pub start_time: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            default_world: default_world_id(),
            day_length: default_day_length(),
            start_time: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_data_dir() -> PathBuf {
    PathBuf::from("plugins").join("Clockface")
}

fn default_file_name() -> String {
    "clocks.json".to_owned()
}

const fn default_initial_delay_ticks() -> u64 {
    10
}

const fn default_interval_ticks() -> u64 {
    10
}

const fn default_tick_duration_ms() -> u64 {
    50
}

const fn default_hour_offset() -> u64 {
    3000
}

const fn default_hour_period() -> u64 {
    12_000
}

const fn default_minute_period() -> u64 {
    1000
}

const fn default_world_id() -> WorldId {
    WorldId(Uuid::nil())
}

const fn default_day_length() -> u64 {
    24_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
