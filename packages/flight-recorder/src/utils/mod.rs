// packages/flight-recorder/src/utils/mod.rs
//! Shared utilities
//!
//! - **errors**: Error taxonomy and `Result` alias
//! - **config**: Layered configuration loading

pub mod config;
pub mod errors;

pub use self::config::{LogFormat, RecorderConfig};
pub use self::errors::{RecorderError, Result};
