// packages/flight-recorder/src/recording/recorder.rs
//! Stateful event recorder over a circular buffer
//!
//! Every `record_event` call consumes a sequence number, even while
//! stopped; only calls made while recording store an entry. Gaps in the
//! stored sequence numbers therefore show where events were skipped.
//!
//! ```text
//!            start_recording()
//!   Stopped ──────────────────► Recording
//!      ▲                            │
//!      └────────────────────────────┘
//!            stop_recording()
//! ```

use crate::observability::EVENTS_EVICTED_TOTAL;
use crate::recording::dump::{dump_to, DumpSink, DumpWindow};
use crate::recording::event::{now_millis, EventIdentity, RecordedEntry, RecordedEvent};
use crate::recording::ring_buffer::{BufferStats, CircularBuffer, Iter};
use crate::utils::errors::{RecorderError, Result};
use metrics::counter;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    /// Calls consume sequence numbers but store nothing
    #[default]
    Stopped,

    /// Calls store timestamped entries
    Recording,
}

/// In-memory flight recorder
///
/// Not synchronised: wrap it in a [`SharedRecorder`](crate::SharedRecorder)
/// to share across threads.
#[derive(Debug)]
pub struct EventRecorder<E = RecordedEntry> {
    buffer: CircularBuffer<E>,
    state: RecorderState,

    /// Last issued sequence number (0 before the first call)
    sequence_number: u64,

    /// Set once, on first activation
    window_start_ms: Option<i64>,

    /// Time of the last record accepted while recording
    window_end_ms: Option<i64>,
}

impl<E: RecordedEvent> EventRecorder<E> {
    /// Create a stopped recorder keeping at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self> {
        let buffer = CircularBuffer::new(capacity)?;
        debug!(capacity, "Created event recorder");
        Ok(Self::from_buffer(buffer))
    }

    /// Create a stopped recorder from a capacity known to be non-zero
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        debug!(capacity = capacity.get(), "Created event recorder");
        Self::from_buffer(CircularBuffer::with_capacity(capacity))
    }

    fn from_buffer(buffer: CircularBuffer<E>) -> Self {
        Self {
            buffer,
            state: RecorderState::Stopped,
            sequence_number: 0,
            window_start_ms: None,
            window_end_ms: None,
        }
    }

    /// Record an occurrence of `event`
    ///
    /// Never fails. When the buffer is full the oldest entry is evicted and
    /// counted in [`lost_count`](Self::lost_count).
    pub fn record_event<I>(&mut self, event: &I) -> &mut Self
    where
        I: EventIdentity<Entry = E> + ?Sized,
    {
        self.sequence_number += 1;

        if self.state == RecorderState::Recording {
            self.window_end_ms = Some(now_millis());

            let entry = event.entry(self.sequence_number);
            if self.buffer.put(entry).is_some() {
                counter!(EVENTS_EVICTED_TOTAL).increment(1);
            }
        }

        self
    }

    /// Enable recording; the first activation fixes the window start
    pub fn start_recording(&mut self) -> &mut Self {
        if self.window_start_ms.is_none() {
            let now = now_millis();
            self.window_start_ms = Some(now);
            debug!(window_start_ms = now, "Recording window opened");
        }

        if self.state != RecorderState::Recording {
            debug!(sequence_number = self.sequence_number, "Recording started");
        }
        self.state = RecorderState::Recording;

        self
    }

    /// Disable recording; stored entries and the sequence are kept
    pub fn stop_recording(&mut self) -> &mut Self {
        if self.state != RecorderState::Stopped {
            debug!(sequence_number = self.sequence_number, "Recording stopped");
        }
        self.state = RecorderState::Stopped;

        self
    }

    /// Drop every stored entry and reset the loss counter
    ///
    /// Recording state, sequence and window start are untouched.
    pub fn clear_all_recorded_events(&mut self) -> &mut Self {
        debug!(
            discarded = self.buffer.count(),
            "Clearing all recorded events"
        );
        self.buffer.clear();

        self
    }

    /// Entries currently stored
    pub fn number_of_entries_recorded(&self) -> usize {
        self.buffer.count()
    }

    /// Replay stored entries, oldest first, through `sink`
    ///
    /// Non-destructive: the stored entries are unchanged afterwards.
    pub fn dump_entries_to<S: DumpSink + ?Sized>(&self, sink: &mut S) -> Result<&Self> {
        let lost = self.buffer.lost_count();
        if lost > 0 {
            warn!(
                lost,
                capacity = self.buffer.capacity(),
                "Events were evicted before this dump; capacity may be too small"
            );
        }

        dump_to(self.window(), self.buffer.iter(), sink)?;

        Ok(self)
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Last issued sequence number, 0 before the first `record_event`
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Entries evicted since construction or the last clear
    pub fn lost_count(&self) -> u64 {
        self.buffer.lost_count()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Recording window as reported to sinks (0 for unset ends)
    pub fn window(&self) -> DumpWindow {
        DumpWindow::new(
            self.window_start_ms.unwrap_or(0),
            self.window_end_ms.unwrap_or(0),
        )
    }

    /// Stored entries, oldest first
    pub fn entries(&self) -> Iter<'_, E> {
        self.buffer.iter()
    }

    pub fn stats(&self) -> BufferStats {
        self.buffer.stats()
    }
}

/// A recorder slot that may be deliberately left invalid
///
/// Use `RecorderHandle::Invalid` to initialise a recorder-holding field
/// before it is wired up. Every operation on it fails with `IllegalUse`
/// naming the operation, so a forgotten initialisation is caught on first
/// use.
#[derive(Debug)]
pub enum RecorderHandle<E = RecordedEntry> {
    Invalid,
    Active(EventRecorder<E>),
}

impl<E: RecordedEvent> RecorderHandle<E> {
    fn invalid(operation: String) -> RecorderError {
        RecorderError::illegal_use(format!("Use of RecorderHandle::Invalid: {}", operation))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, RecorderHandle::Active(_))
    }

    /// Borrow the recorder, or fail naming `operation`
    pub fn recorder(&self, operation: &str) -> Result<&EventRecorder<E>> {
        match self {
            RecorderHandle::Active(recorder) => Ok(recorder),
            RecorderHandle::Invalid => Err(Self::invalid(operation.to_string())),
        }
    }

    /// Mutably borrow the recorder, or fail naming `operation`
    pub fn recorder_mut(&mut self, operation: &str) -> Result<&mut EventRecorder<E>> {
        match self {
            RecorderHandle::Active(recorder) => Ok(recorder),
            RecorderHandle::Invalid => Err(Self::invalid(operation.to_string())),
        }
    }

    pub fn record_event<I>(&mut self, event: &I) -> Result<&mut Self>
    where
        I: EventIdentity<Entry = E> + ?Sized,
    {
        if let RecorderHandle::Invalid = self {
            return Err(Self::invalid(format!(
                "record_event({})",
                event.event_name()
            )));
        }

        self.recorder_mut("record_event")?.record_event(event);
        Ok(self)
    }

    pub fn start_recording(&mut self) -> Result<&mut Self> {
        self.recorder_mut("start_recording()")?.start_recording();
        Ok(self)
    }

    pub fn stop_recording(&mut self) -> Result<&mut Self> {
        self.recorder_mut("stop_recording()")?.stop_recording();
        Ok(self)
    }

    pub fn clear_all_recorded_events(&mut self) -> Result<&mut Self> {
        self.recorder_mut("clear_all_recorded_events()")?
            .clear_all_recorded_events();
        Ok(self)
    }

    pub fn number_of_entries_recorded(&self) -> Result<usize> {
        Ok(self
            .recorder("number_of_entries_recorded()")?
            .number_of_entries_recorded())
    }

    pub fn dump_entries_to<S: DumpSink + ?Sized>(&self, sink: &mut S) -> Result<&Self> {
        self.recorder("dump_entries_to(sink)")?.dump_entries_to(sink)?;
        Ok(self)
    }
}

impl<E> Default for RecorderHandle<E> {
    fn default() -> Self {
        RecorderHandle::Invalid
    }
}

impl<E> From<EventRecorder<E>> for RecorderHandle<E> {
    fn from(recorder: EventRecorder<E>) -> Self {
        RecorderHandle::Active(recorder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::dump::tests::CallLog;
    use crate::recording::event::StaticEvent;

    const EVENT1: StaticEvent = StaticEvent::new(1, "FLIGHT_RECORDER_TEST_EVENT1");
    const EVENT2: StaticEvent = StaticEvent::new(2, "FLIGHT_RECORDER_TEST_EVENT2");
    const EVENT3: StaticEvent = StaticEvent::new(3, "FLIGHT_RECORDER_TEST_EVENT3");

    fn recorder(capacity: usize) -> EventRecorder {
        EventRecorder::new(capacity).unwrap()
    }

    fn stored_sequence_numbers(recorder: &EventRecorder) -> Vec<u64> {
        recorder.entries().map(|e| e.sequence_number).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = EventRecorder::<RecordedEntry>::new(0);
        assert!(matches!(
            result,
            Err(RecorderError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_record_start_clear_scenario() {
        let mut fr = recorder(3);

        fr.record_event(&EVENT1);
        assert_eq!(fr.number_of_entries_recorded(), 0);

        fr.start_recording();
        fr.record_event(&EVENT2);
        assert_eq!(fr.number_of_entries_recorded(), 1);
        fr.record_event(&EVENT3);
        assert_eq!(fr.number_of_entries_recorded(), 2);

        fr.clear_all_recorded_events();
        assert_eq!(fr.number_of_entries_recorded(), 0);

        fr.record_event(&EVENT1)
            .record_event(&EVENT2)
            .record_event(&EVENT3);
        assert_eq!(fr.number_of_entries_recorded(), 3);
    }

    #[test]
    fn test_disabled_calls_consume_sequence_numbers() {
        let mut fr = recorder(10);

        fr.record_event(&EVENT1);
        fr.start_recording();
        fr.record_event(&EVENT2);
        fr.stop_recording();
        fr.record_event(&EVENT3);
        fr.record_event(&EVENT3);
        fr.start_recording();
        fr.record_event(&EVENT1);

        assert_eq!(fr.sequence_number(), 5);
        assert_eq!(stored_sequence_numbers(&fr), vec![2, 5]);
    }

    #[test]
    fn test_clear_keeps_sequence_and_state() {
        let mut fr = recorder(4);
        fr.start_recording();
        fr.record_event(&EVENT1).record_event(&EVENT2);
        let window_start = fr.window().start_ms;

        fr.clear_all_recorded_events();

        assert!(fr.is_recording());
        assert_eq!(fr.sequence_number(), 2);
        assert_eq!(fr.window().start_ms, window_start);

        fr.record_event(&EVENT3);
        assert_eq!(stored_sequence_numbers(&fr), vec![3]);
    }

    #[test]
    fn test_state_transitions_are_idempotent() {
        let mut fr = recorder(2);
        assert_eq!(fr.state(), RecorderState::Stopped);

        fr.stop_recording();
        assert_eq!(fr.state(), RecorderState::Stopped);

        fr.start_recording();
        let first_start = fr.window().start_ms;
        fr.start_recording();
        assert_eq!(fr.state(), RecorderState::Recording);
        assert_eq!(fr.window().start_ms, first_start);

        fr.stop_recording().start_recording();
        assert_eq!(fr.window().start_ms, first_start);
    }

    #[test]
    fn test_window_unset_until_used() {
        let mut fr = recorder(2);
        assert_eq!(fr.window(), DumpWindow::new(0, 0));

        fr.record_event(&EVENT1);
        assert_eq!(fr.window(), DumpWindow::new(0, 0));

        fr.start_recording();
        assert!(fr.window().start_ms > 0);
        assert_eq!(fr.window().end_ms, 0);

        fr.record_event(&EVENT1);
        assert!(fr.window().end_ms >= fr.window().start_ms);
    }

    #[test]
    fn test_window_end_ignores_stopped_records() {
        let mut fr = recorder(2);
        fr.start_recording();
        fr.record_event(&EVENT1);
        let end = fr.window().end_ms;

        fr.stop_recording();
        std::thread::sleep(std::time::Duration::from_millis(5));
        fr.record_event(&EVENT2);

        assert_eq!(fr.window().end_ms, end);
    }

    #[test]
    fn test_overflow_counts_lost_events() {
        let mut fr = recorder(3);
        fr.start_recording();
        for _ in 0..5 {
            fr.record_event(&EVENT1);
        }

        assert_eq!(fr.number_of_entries_recorded(), 3);
        assert_eq!(fr.lost_count(), 2);
        assert_eq!(stored_sequence_numbers(&fr), vec![3, 4, 5]);
    }

    #[test]
    fn test_dump_is_non_destructive() {
        let mut fr = recorder(5);
        fr.start_recording();
        fr.record_event(&EVENT1).record_event(&EVENT2);

        let mut sink = CallLog::default();
        fr.dump_entries_to(&mut sink).unwrap();
        fr.dump_entries_to(&mut sink).unwrap();

        assert_eq!(fr.number_of_entries_recorded(), 2);
        assert_eq!(
            sink.calls
                .iter()
                .filter(|c| c.starts_with("event"))
                .count(),
            4
        );
        assert_eq!(sink.calls[2], "count 2");
        assert_eq!(sink.calls[3], "event FLIGHT_RECORDER_TEST_EVENT1 #1");
    }

    #[test]
    fn test_dump_order_after_wraparound() {
        let mut fr = recorder(2);
        fr.start_recording();
        fr.record_event(&EVENT1)
            .record_event(&EVENT2)
            .record_event(&EVENT3);

        let mut sink = CallLog::default();
        fr.dump_entries_to(&mut sink).unwrap();

        let events: Vec<_> = sink
            .calls
            .iter()
            .filter(|c| c.starts_with("event"))
            .cloned()
            .collect();
        assert_eq!(
            events,
            vec![
                "event FLIGHT_RECORDER_TEST_EVENT2 #2",
                "event FLIGHT_RECORDER_TEST_EVENT3 #3",
            ]
        );
    }

    /// Entry carrying a payload byte instead of a wall-clock time
    #[derive(Debug)]
    struct ByteEntry {
        byte: u8,
        sequence_number: u64,
    }

    impl RecordedEvent for ByteEntry {
        fn event_id(&self) -> i64 {
            100 + self.byte as i64
        }

        fn event_name(&self) -> &str {
            "BYTE"
        }

        fn timestamp_ms(&self) -> i64 {
            0
        }

        fn sequence_number(&self) -> u64 {
            self.sequence_number
        }
    }

    struct Byte(u8);

    impl EventIdentity for Byte {
        type Entry = ByteEntry;

        fn event_name(&self) -> &str {
            "BYTE"
        }

        fn event_id(&self) -> i64 {
            100 + self.0 as i64
        }

        fn entry(&self, sequence_number: u64) -> ByteEntry {
            ByteEntry {
                byte: self.0,
                sequence_number,
            }
        }
    }

    #[test]
    fn test_custom_entry_shape() {
        let mut fr: EventRecorder<ByteEntry> = EventRecorder::new(2).unwrap();
        fr.start_recording();
        fr.record_event(&Byte(1))
            .record_event(&Byte(2))
            .record_event(&Byte(3));

        let bytes: Vec<u8> = fr.entries().map(|e| e.byte).collect();
        assert_eq!(bytes, vec![2, 3]);

        let mut sink = CallLog::default();
        fr.dump_entries_to(&mut sink).unwrap();
        assert_eq!(sink.calls[3], "event BYTE #2");
    }

    #[test]
    fn test_invalid_handle_rejects_every_operation() {
        let mut handle: RecorderHandle = RecorderHandle::default();
        assert!(!handle.is_valid());

        let operation = |err: RecorderError| match err {
            RecorderError::IllegalUse { operation } => operation,
            other => panic!("unexpected error: {}", other),
        };

        assert!(operation(handle.record_event(&EVENT1).unwrap_err())
            .contains("record_event(FLIGHT_RECORDER_TEST_EVENT1)"));
        assert!(operation(handle.start_recording().unwrap_err()).contains("start_recording()"));
        assert!(operation(handle.stop_recording().unwrap_err()).contains("stop_recording()"));
        assert!(operation(handle.clear_all_recorded_events().unwrap_err())
            .contains("clear_all_recorded_events()"));
        assert!(operation(handle.number_of_entries_recorded().unwrap_err())
            .contains("number_of_entries_recorded()"));

        let mut sink = CallLog::default();
        assert!(operation(handle.dump_entries_to(&mut sink).unwrap_err())
            .contains("dump_entries_to"));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_active_handle_delegates() {
        let mut handle = RecorderHandle::from(recorder(3));
        assert!(handle.is_valid());

        handle
            .start_recording()
            .unwrap()
            .record_event(&EVENT1)
            .unwrap()
            .record_event(&EVENT2)
            .unwrap();

        assert_eq!(handle.number_of_entries_recorded().unwrap(), 2);
        handle.clear_all_recorded_events().unwrap();
        assert_eq!(handle.number_of_entries_recorded().unwrap(), 0);
        handle.stop_recording().unwrap();
        assert!(!handle.recorder("state").unwrap().is_recording());
    }
}
