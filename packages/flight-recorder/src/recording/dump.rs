// packages/flight-recorder/src/recording/dump.rs
//! Dump protocol between a recorder and an external sink
//!
//! A dump replays stored entries, oldest first, through exactly five kinds
//! of call:
//!
//! ```text
//! set_dump_timestamps(start, end)
//! dump_begins()
//! set_number_of_events_to_be_dumped(n)
//! dump_event(e1) … dump_event(en)
//! dump_complete()
//! ```
//!
//! Dumps never remove entries from the recorder.

use crate::observability::{DUMPS_TOTAL, EVENTS_DUMPED_TOTAL};
use crate::recording::event::RecordedEvent;
use crate::utils::errors::{RecorderError, Result};
use metrics::counter;
use serde::Serialize;
use tracing::debug;

/// Receiver of a dump
///
/// Sink errors abort the dump and are returned to the caller of the dump.
pub trait DumpSink {
    /// Window of the recording: first activation and last accepted record,
    /// both in milliseconds since the Unix epoch, 0 when unset
    fn set_dump_timestamps(&mut self, window_start_ms: i64, window_end_ms: i64) -> Result<()>;

    /// Reset any per-dump state
    fn dump_begins(&mut self) -> Result<()>;

    /// Exact number of `dump_event` calls that follow
    fn set_number_of_events_to_be_dumped(&mut self, count: usize) -> Result<()>;

    fn dump_event(&mut self, event: &dyn RecordedEvent) -> Result<()>;

    /// End of stream; flush or close owned resources here
    fn dump_complete(&mut self) -> Result<()>;
}

/// Time span covered by a recording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DumpWindow {
    /// First activation, 0 if recording never started
    pub start_ms: i64,

    /// Last record accepted while recording, 0 if none
    pub end_ms: i64,
}

impl DumpWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Length of the window in milliseconds, 0 while incomplete
    pub fn duration_ms(&self) -> i64 {
        if self.start_ms == 0 || self.end_ms == 0 {
            0
        } else {
            self.end_ms - self.start_ms
        }
    }
}

/// Drive `sink` through the dump protocol over `entries`
///
/// Returns the number of events dumped.
pub fn dump_to<'a, E, I, S>(window: DumpWindow, entries: I, sink: &mut S) -> Result<usize>
where
    E: RecordedEvent + 'a,
    I: ExactSizeIterator<Item = &'a E>,
    S: DumpSink + ?Sized,
{
    let count = entries.len();
    debug!(
        events = count,
        window_start_ms = window.start_ms,
        window_end_ms = window.end_ms,
        "Dumping recorded events"
    );

    sink.set_dump_timestamps(window.start_ms, window.end_ms)?;
    sink.dump_begins()?;
    sink.set_number_of_events_to_be_dumped(count)?;
    for entry in entries {
        sink.dump_event(entry)?;
    }
    sink.dump_complete()?;

    counter!(DUMPS_TOTAL).increment(1);
    counter!(EVENTS_DUMPED_TOTAL).increment(count as u64);

    Ok(count)
}

/// Placeholder sink for not-yet-wired dump targets
///
/// Every call fails with `IllegalUse`, naming the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidDumpSink;

impl InvalidDumpSink {
    fn fail(operation: String) -> RecorderError {
        RecorderError::illegal_use(format!("Use of InvalidDumpSink: {}", operation))
    }
}

impl DumpSink for InvalidDumpSink {
    fn set_dump_timestamps(&mut self, window_start_ms: i64, window_end_ms: i64) -> Result<()> {
        Err(Self::fail(format!(
            "set_dump_timestamps({}, {})",
            window_start_ms, window_end_ms
        )))
    }

    fn dump_begins(&mut self) -> Result<()> {
        Err(Self::fail("dump_begins()".to_string()))
    }

    fn set_number_of_events_to_be_dumped(&mut self, count: usize) -> Result<()> {
        Err(Self::fail(format!(
            "set_number_of_events_to_be_dumped({})",
            count
        )))
    }

    fn dump_event(&mut self, event: &dyn RecordedEvent) -> Result<()> {
        Err(Self::fail(format!("dump_event({})", event.event_name())))
    }

    fn dump_complete(&mut self) -> Result<()> {
        Err(Self::fail("dump_complete()".to_string()))
    }
}
