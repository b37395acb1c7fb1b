// packages/flight-recorder/src/recording/exporter.rs
//! Dump sinks that render recordings for humans and tools
//!
//! Supports:
//! - Text (timeline report, in memory or to any `io::Write`)
//! - JSON (for analysis, visualization)

use crate::recording::dump::{DumpSink, DumpWindow};
use crate::recording::event::RecordedEvent;
use crate::recording::recorder::EventRecorder;
use crate::utils::errors::Result;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use tracing::debug;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Text timeline report
    Text,

    /// JSON document
    Json,
}

/// One-shot exporter of a recorder's current contents
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Dump `recorder` into a string under `title`
    pub fn export<E: RecordedEvent>(&self, recorder: &EventRecorder<E>, title: &str) -> Result<String> {
        debug!(
            events = recorder.number_of_entries_recorded(),
            format = ?self.format,
            "Exporting recording"
        );

        match self.format {
            ExportFormat::Text => {
                let mut sink = TextDumpSink::new(title);
                recorder.dump_entries_to(&mut sink)?;
                Ok(sink.into_report())
            }
            ExportFormat::Json => {
                let mut sink = JsonDumpSink::new(title);
                recorder.dump_entries_to(&mut sink)?;
                sink.to_json()
            }
        }
    }
}

fn report_header(title: &str) -> String {
    format!(
        "Flight Recorder Dump: {}\nDump created: {}\n",
        title,
        Local::now().format("%a %b %d %H:%M:%S %Y")
    )
}

/// Text timeline sink
///
/// Renders a title, creation time, the window timestamps, the event count
/// and one line per event:
///
/// ```text
///    1:    1(EVENT1)                                    1 +0.000
/// ```
///
/// Ordinals are 1-based and restart at every dump. The header is written
/// once, when the sink is created; later dumps append to the same output.
pub struct TextDumpSink<W = Vec<u8>> {
    out: W,
    window_start_ms: i64,
    event_number: usize,
}

impl TextDumpSink<Vec<u8>> {
    /// In-memory report
    pub fn new(title: &str) -> Self {
        Self {
            out: report_header(title).into_bytes(),
            window_start_ms: 0,
            event_number: 0,
        }
    }

    /// Report rendered so far
    pub fn report(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    pub fn into_report(self) -> String {
        match String::from_utf8(self.out) {
            Ok(report) => report,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

impl fmt::Display for TextDumpSink<Vec<u8>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.out))
    }
}

impl<W: Write> TextDumpSink<W> {
    /// Report written to `out` (a file, stdout, a socket...)
    ///
    /// `out` is flushed when each dump completes.
    pub fn with_writer(title: &str, mut out: W) -> Result<Self> {
        out.write_all(report_header(title).as_bytes())?;

        Ok(Self {
            out,
            window_start_ms: 0,
            event_number: 0,
        })
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DumpSink for TextDumpSink<W> {
    fn set_dump_timestamps(&mut self, window_start_ms: i64, window_end_ms: i64) -> Result<()> {
        self.window_start_ms = window_start_ms;
        writeln!(
            self.out,
            "Initial dump timestamp={}, final dump timestamp={}",
            window_start_ms, window_end_ms
        )?;
        Ok(())
    }

    fn dump_begins(&mut self) -> Result<()> {
        self.event_number = 0;
        Ok(())
    }

    fn set_number_of_events_to_be_dumped(&mut self, count: usize) -> Result<()> {
        writeln!(self.out, "number of events: {}", count)?;
        Ok(())
    }

    fn dump_event(&mut self, event: &dyn RecordedEvent) -> Result<()> {
        self.event_number += 1;
        let offset_secs = (event.timestamp_ms() - self.window_start_ms) as f64 / 1000.0;

        writeln!(
            self.out,
            "{:4}: {:4}{:<40} {:4} +{:.3}",
            self.event_number,
            event.event_id(),
            format!("({})", event.event_name()),
            event.sequence_number(),
            offset_secs
        )?;
        Ok(())
    }

    fn dump_complete(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// JSON document produced by [`JsonDumpSink`]
#[derive(Debug, Clone, Serialize)]
pub struct DumpDocument {
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub window_start_ms: i64,
    pub window_end_ms: i64,
    pub expected_events: usize,
    pub events: Vec<DumpedEvent>,
}

/// One event in a [`DumpDocument`]
#[derive(Debug, Clone, Serialize)]
pub struct DumpedEvent {
    pub ordinal: usize,
    pub event_id: i64,
    pub event_name: String,
    pub sequence_number: u64,
    pub timestamp_ms: i64,

    /// Milliseconds since the window start
    pub offset_ms: i64,
}

/// Sink that collects the most recent dump into a [`DumpDocument`]
pub struct JsonDumpSink {
    document: DumpDocument,
}

impl JsonDumpSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            document: DumpDocument {
                title: title.into(),
                created_at: Utc::now(),
                window_start_ms: 0,
                window_end_ms: 0,
                expected_events: 0,
                events: Vec::new(),
            },
        }
    }

    pub fn document(&self) -> &DumpDocument {
        &self.document
    }

    pub fn window(&self) -> DumpWindow {
        DumpWindow::new(self.document.window_start_ms, self.document.window_end_ms)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }
}

impl DumpSink for JsonDumpSink {
    fn set_dump_timestamps(&mut self, window_start_ms: i64, window_end_ms: i64) -> Result<()> {
        self.document.window_start_ms = window_start_ms;
        self.document.window_end_ms = window_end_ms;
        Ok(())
    }

    fn dump_begins(&mut self) -> Result<()> {
        self.document.events.clear();
        Ok(())
    }

    fn set_number_of_events_to_be_dumped(&mut self, count: usize) -> Result<()> {
        self.document.expected_events = count;
        self.document.events.reserve(count);
        Ok(())
    }

    fn dump_event(&mut self, event: &dyn RecordedEvent) -> Result<()> {
        let ordinal = self.document.events.len() + 1;
        self.document.events.push(DumpedEvent {
            ordinal,
            event_id: event.event_id(),
            event_name: event.event_name().to_string(),
            sequence_number: event.sequence_number(),
            timestamp_ms: event.timestamp_ms(),
            offset_ms: event.timestamp_ms() - self.document.window_start_ms,
        });
        Ok(())
    }

    fn dump_complete(&mut self) -> Result<()> {
        Ok(())
    }
}
