// packages/flight-recorder/src/recording/shared.rs
//! Lock-protected recorder handle for multi-threaded hosts
//!
//! [`EventRecorder`] itself does no synchronisation. `SharedRecorder` puts
//! it behind a `parking_lot::Mutex` so clones can record from any thread
//! and a reader can dump while writers keep recording.

use crate::recording::dump::DumpSink;
use crate::recording::event::{EventIdentity, RecordedEntry, RecordedEvent};
use crate::recording::recorder::{EventRecorder, RecorderState};
use crate::utils::errors::Result;
use parking_lot::{Mutex, MutexGuard};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Cloneable, thread-safe handle to one recorder
pub struct SharedRecorder<E = RecordedEntry> {
    inner: Arc<Mutex<EventRecorder<E>>>,
}

impl<E: RecordedEvent> SharedRecorder<E> {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_recorder(EventRecorder::new(capacity)?))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self::from_recorder(EventRecorder::with_capacity(capacity))
    }

    pub fn from_recorder(recorder: EventRecorder<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recorder)),
        }
    }

    pub fn record_event<I>(&self, event: &I) -> &Self
    where
        I: EventIdentity<Entry = E> + ?Sized,
    {
        self.inner.lock().record_event(event);
        self
    }

    pub fn start_recording(&self) -> &Self {
        self.inner.lock().start_recording();
        self
    }

    pub fn stop_recording(&self) -> &Self {
        self.inner.lock().stop_recording();
        self
    }

    pub fn clear_all_recorded_events(&self) -> &Self {
        self.inner.lock().clear_all_recorded_events();
        self
    }

    pub fn number_of_entries_recorded(&self) -> usize {
        self.inner.lock().number_of_entries_recorded()
    }

    /// Dump under the lock; writers block until the dump completes
    pub fn dump_entries_to<S: DumpSink + ?Sized>(&self, sink: &mut S) -> Result<&Self> {
        self.inner.lock().dump_entries_to(sink)?;
        Ok(self)
    }

    pub fn state(&self) -> RecorderState {
        self.inner.lock().state()
    }

    pub fn sequence_number(&self) -> u64 {
        self.inner.lock().sequence_number()
    }

    pub fn lost_count(&self) -> u64 {
        self.inner.lock().lost_count()
    }

    /// Lock the recorder for a batch of operations
    pub fn lock(&self) -> MutexGuard<'_, EventRecorder<E>> {
        self.inner.lock()
    }

    /// Whether both handles refer to the same recorder
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> Clone for SharedRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for SharedRecorder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRecorder")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}
