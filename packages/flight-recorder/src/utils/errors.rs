// packages/flight-recorder/src/utils/errors.rs
//! Error types for the flight recorder
//!
//! The first four variants are programming errors: they are surfaced to the
//! caller immediately and never masked. Recording itself never fails; losing
//! old entries on overflow is reported through the loss counter instead.

use thiserror::Error;

/// Result type alias for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Errors raised by the recorder, its buffer and its sinks
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Construction-time parameter is unusable (e.g. zero capacity)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Peek index outside `[0, count)`
    #[error("Attempt to peek at item number {index} when there are {count} items")]
    OutOfRange { index: usize, count: usize },

    /// Pop on an empty buffer
    #[error("Attempt to pop an entry from an empty buffer")]
    EmptyBuffer,

    /// Operation invoked on an explicitly invalid recorder or sink
    #[error("Illegal use: {operation}")]
    IllegalUse { operation: String },

    /// Sink output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export serialization failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Configuration could not be loaded or applied
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RecorderError {
    /// Build an `IllegalUse` error naming the attempted operation
    pub fn illegal_use(operation: impl Into<String>) -> Self {
        RecorderError::IllegalUse {
            operation: operation.into(),
        }
    }

    /// Whether this error signals a caller bug rather than an environment failure
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            RecorderError::InvalidConfiguration(_)
                | RecorderError::OutOfRange { .. }
                | RecorderError::EmptyBuffer
                | RecorderError::IllegalUse { .. }
        )
    }
}

impl From<config::ConfigError> for RecorderError {
    fn from(err: config::ConfigError) -> Self {
        RecorderError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RecorderError {
    fn from(err: serde_json::Error) -> Self {
        RecorderError::ExportFailed(format!("JSON serialization error: {}", err))
    }
}
