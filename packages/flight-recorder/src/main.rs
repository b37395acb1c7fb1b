// packages/flight-recorder/src/main.rs
//! Flight Recorder demo
//!
//! Records a short synthetic timeline and prints the dump report.
//!
//! Usage: `flight-recorder [config-file]`

use anyhow::{Context, Result};
use flight_recorder::observability::{describe_metrics, init_tracing};
use flight_recorder::recording::exporter::TextDumpSink;
use flight_recorder::{RecorderConfig, RecorderRegistry, StaticEvent};
use std::thread;
use std::time::Duration;
use tracing::info;

const STARTUP: StaticEvent = StaticEvent::new(1, "STARTUP");
const REQUEST_RECEIVED: StaticEvent = StaticEvent::new(10, "REQUEST_RECEIVED");
const CACHE_MISS: StaticEvent = StaticEvent::new(11, "CACHE_MISS");
const REQUEST_COMPLETED: StaticEvent = StaticEvent::new(12, "REQUEST_COMPLETED");
const SHUTDOWN: StaticEvent = StaticEvent::new(2, "SHUTDOWN");

fn main() -> Result<()> {
    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => RecorderConfig::load_from(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => RecorderConfig::load().context("Failed to load configuration")?,
    };

    init_tracing(&config)?;
    describe_metrics();

    info!("Starting Flight Recorder demo v{}", flight_recorder::VERSION);
    info!("Configuration loaded: {:?}", config);

    let registry = RecorderRegistry::global();
    let recorder = registry
        .recorder_with_capacity(config.capacity)
        .context("Failed to construct recorder")?;

    // Not yet recording: consumes sequence number 1 only
    recorder.record_event(&STARTUP);
    recorder.start_recording();

    for request in 0..5 {
        recorder.record_event(&REQUEST_RECEIVED);
        if request % 2 == 0 {
            recorder.record_event(&CACHE_MISS);
        }
        thread::sleep(Duration::from_millis(3));
        recorder.record_event(&REQUEST_COMPLETED);
    }

    recorder.record_event(&SHUTDOWN).stop_recording();

    let last = registry.last_recorder()?;
    let stdout = std::io::stdout();
    let mut sink = TextDumpSink::with_writer(&config.dump_title, stdout.lock())?;
    last.dump_entries_to(&mut sink)?;

    info!(
        entries = last.number_of_entries_recorded(),
        lost = last.lost_count(),
        "Dump complete"
    );

    Ok(())
}
