// packages/flight-recorder/src/recording/mod.rs
//! Event recording and dumping
//!
//! - **Ring Buffer**: Fixed-capacity, overwrite-oldest storage
//! - **Event**: Event identities and recorded entries
//! - **Recorder**: Start/stop gated recorder with sequence numbering
//! - **Dump**: Five-call replay protocol towards external sinks
//! - **Exporter**: Text and JSON sinks
//! - **Shared**: Lock-protected recorder handle
//! - **Registry**: Recorder factory and last-constructed slot
//!
//! # Performance
//!
//! - **Record**: O(1), no allocation for `'static` event names
//! - **Memory**: fixed at construction, never grows
//! - **Clear / Dump**: O(capacity) / O(entries)
//!
//! # Architecture
//!
//! ```text
//! caller → record_event(id) ─[recording?]→ CircularBuffer::put(entry)
//!                                              ↓ (full: evict oldest, lost += 1)
//! caller → dump_entries_to(sink) → iterate oldest → newest → DumpSink
//! ```

pub mod dump;
pub mod event;
pub mod exporter;
pub mod recorder;
pub mod registry;
pub mod ring_buffer;
pub mod shared;

// Re-export commonly used types
pub use dump::{DumpSink, DumpWindow, InvalidDumpSink};
pub use event::{EventIdentity, RecordedEntry, RecordedEvent, StaticEvent};
pub use exporter::{DumpDocument, ExportFormat, Exporter, JsonDumpSink, TextDumpSink};
pub use recorder::{EventRecorder, RecorderHandle, RecorderState};
pub use registry::{RecorderRegistry, DEFAULT_CAPACITY};
pub use ring_buffer::{BufferStats, CircularBuffer};
pub use shared::SharedRecorder;
