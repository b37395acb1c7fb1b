// packages/flight-recorder/src/recording/event.rs
//! Event identities and the entries recorded for them
//!
//! An application describes *what* happened with an [`EventIdentity`]
//! (usually a fieldless enum or a [`StaticEvent`] constant). The recorder
//! asks the identity to materialise its own entry for a sequence number, so
//! custom entry shapes stay pluggable; [`RecordedEntry`] is the default.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A stored occurrence, as seen by dump sinks
pub trait RecordedEvent {
    /// Opaque application event code
    fn event_id(&self) -> i64;

    /// Human-readable event name
    fn event_name(&self) -> &str;

    /// Capture time in milliseconds since the Unix epoch
    fn timestamp_ms(&self) -> i64;

    /// Sequence number issued by the recorder (starts at 1)
    fn sequence_number(&self) -> u64;
}

/// Something that can be recorded
pub trait EventIdentity {
    /// Entry type stored in the recorder's buffer
    type Entry: RecordedEvent;

    fn event_name(&self) -> &str;

    fn event_id(&self) -> i64;

    /// Materialise the entry stored for this occurrence
    fn entry(&self, sequence_number: u64) -> Self::Entry;

    /// Name as stored in a [`RecordedEntry`]
    ///
    /// Identities with `'static` names should override this to avoid an
    /// allocation per record.
    fn entry_name(&self) -> Cow<'static, str> {
        Cow::Owned(self.event_name().to_owned())
    }
}

/// Default entry: identity stamped with a capture time and sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedEntry {
    pub event_id: i64,
    pub event_name: Cow<'static, str>,
    pub timestamp_ms: i64,
    pub sequence_number: u64,
}

impl RecordedEntry {
    pub fn new(
        event_id: i64,
        event_name: impl Into<Cow<'static, str>>,
        timestamp_ms: i64,
        sequence_number: u64,
    ) -> Self {
        Self {
            event_id,
            event_name: event_name.into(),
            timestamp_ms,
            sequence_number,
        }
    }

    /// Stamp `identity` with the current time and `sequence_number`
    pub fn stamp<I: EventIdentity + ?Sized>(identity: &I, sequence_number: u64) -> Self {
        Self {
            event_id: identity.event_id(),
            event_name: identity.entry_name(),
            timestamp_ms: now_millis(),
            sequence_number,
        }
    }
}

impl RecordedEvent for RecordedEntry {
    fn event_id(&self) -> i64 {
        self.event_id
    }

    fn event_name(&self) -> &str {
        &self.event_name
    }

    fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    fn sequence_number(&self) -> u64 {
        self.sequence_number
    }
}

/// Compile-time event identity
///
/// ```
/// use flight_recorder::StaticEvent;
///
/// const CACHE_MISS: StaticEvent = StaticEvent::new(17, "CACHE_MISS");
/// assert_eq!(CACHE_MISS.name(), "CACHE_MISS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticEvent {
    id: i64,
    name: &'static str,
}

impl StaticEvent {
    pub const fn new(id: i64, name: &'static str) -> Self {
        Self { id, name }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl EventIdentity for StaticEvent {
    type Entry = RecordedEntry;

    fn event_name(&self) -> &str {
        self.name
    }

    fn event_id(&self) -> i64 {
        self.id
    }

    fn entry(&self, sequence_number: u64) -> RecordedEntry {
        RecordedEntry::stamp(self, sequence_number)
    }

    fn entry_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.name)
    }
}

impl fmt::Display for StaticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}
