// packages/flight-recorder/src/lib.rs
//! Flight Recorder Library
//!
//! An always-on, fixed-memory recorder of tagged application events. Events
//! are stamped with a time and a sequence number into a circular buffer;
//! when the buffer is full the oldest entry is overwritten. The buffer can
//! be dumped at any time to produce a timeline for postmortem debugging.
//!
//! # Architecture
//!
//! - **recording**: Circular buffer, recorder, dump protocol and sinks
//! - **observability**: Tracing subscriber setup and metric names
//! - **utils**: Errors and configuration
//!
//! # Example
//!
//! ```
//! use flight_recorder::{EventRecorder, StaticEvent, TextDumpSink};
//!
//! const CONNECTED: StaticEvent = StaticEvent::new(1, "CONNECTED");
//! const RETRY: StaticEvent = StaticEvent::new(2, "RETRY");
//!
//! let mut recorder: EventRecorder = EventRecorder::new(64)?;
//! recorder.start_recording();
//! recorder.record_event(&CONNECTED).record_event(&RETRY);
//!
//! let mut sink = TextDumpSink::new("session");
//! recorder.dump_entries_to(&mut sink)?;
//! assert!(sink.report().contains("number of events: 2"));
//! # Ok::<(), flight_recorder::RecorderError>(())
//! ```

// Public module exports
pub mod observability;
pub mod recording;
pub mod utils;

// Re-export commonly used types
pub use recording::{
    CircularBuffer, DumpSink, EventIdentity, EventRecorder, RecordedEntry, RecordedEvent,
    RecorderHandle, RecorderRegistry, RecorderState, SharedRecorder, StaticEvent, TextDumpSink,
    DEFAULT_CAPACITY,
};
pub use utils::config::RecorderConfig;
pub use utils::errors::{RecorderError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
