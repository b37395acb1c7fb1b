// packages/flight-recorder/src/observability/mod.rs
//! Logging and metrics
//!
//! Library code only emits `tracing` events and `metrics` counters; hosts
//! decide where they go. The counters are no-ops until the host installs a
//! metrics recorder.

use crate::utils::config::{LogFormat, RecorderConfig};
use crate::utils::errors::{RecorderError, Result};
use metrics::{describe_counter, Unit};
use tracing_subscriber::EnvFilter;

/// Entries overwritten because the buffer was full
pub const EVENTS_EVICTED_TOTAL: &str = "flight_recorder_events_evicted_total";

/// Completed dumps
pub const DUMPS_TOTAL: &str = "flight_recorder_dumps_total";

/// Entries replayed to sinks
pub const EVENTS_DUMPED_TOTAL: &str = "flight_recorder_events_dumped_total";

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` wins over the configured level. Fails if a subscriber is
/// already installed.
pub fn init_tracing(config: &RecorderConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| RecorderError::Config(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| RecorderError::Config(format!("Failed to install subscriber: {}", e)))
}

/// Register descriptions for the recorder's counters
pub fn describe_metrics() {
    describe_counter!(
        EVENTS_EVICTED_TOTAL,
        Unit::Count,
        "Recorded events overwritten because the buffer was full"
    );
    describe_counter!(DUMPS_TOTAL, Unit::Count, "Completed recorder dumps");
    describe_counter!(
        EVENTS_DUMPED_TOTAL,
        Unit::Count,
        "Recorded events replayed to dump sinks"
    );
}
