// packages/flight-recorder/src/utils/config.rs
//! Layered recorder configuration
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. `flight-recorder.{toml,yaml,json}` in the working directory (optional)
//! 3. `FLIGHT_RECORDER_*` environment variables

use crate::recording::registry::DEFAULT_CAPACITY;
use crate::utils::errors::{RecorderError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Base name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "flight-recorder";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "FLIGHT_RECORDER";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,

    /// One JSON object per line
    Json,
}

/// Recorder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Number of entries kept before the oldest is evicted
    pub capacity: usize,

    /// Start recording as soon as a recorder is constructed
    pub start_recording: bool,

    /// Title printed at the head of text dumps
    pub dump_title: String,

    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            start_recording: false,
            dump_title: "Flight Recorder".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl RecorderConfig {
    /// Load configuration from the optional default file and the environment
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from an explicit file, then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self> {
        let config: RecorderConfig = settings.try_deserialize()?;
        config.validate()?;
        debug!(capacity = config.capacity, "Recorder configuration loaded");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(RecorderError::InvalidConfiguration(
                "capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = RecorderConfig::default();
        assert_eq!(config.capacity, 1000);
        assert!(!config.start_recording);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = RecorderConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RecorderError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_load_from_file_keeps_unset_defaults() {
        let file = write_config("capacity = 16\nlog_format = \"json\"\n");

        let config = RecorderConfig::load_from(file.path()).unwrap();
        assert_eq!(config.capacity, 16);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.dump_title, "Flight Recorder");
    }

    #[test]
    fn test_load_from_file_rejects_zero_capacity() {
        let file = write_config("capacity = 0\n");
        assert!(RecorderConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = RecorderConfig::load_from("/nonexistent/flight-recorder.toml");
        assert!(matches!(result, Err(RecorderError::Config(_))));
    }
}
