// packages/flight-recorder/src/recording/registry.rs
//! Recorder construction and the last-constructed slot
//!
//! A registry hands out [`SharedRecorder`]s with a default or explicit
//! capacity and remembers the most recent one, so code far from the
//! construction site can find it again. The process-wide registry is a
//! convenience; passing recorders explicitly works just as well.

use crate::recording::exporter::TextDumpSink;
use crate::recording::shared::SharedRecorder;
use crate::utils::config::RecorderConfig;
use crate::utils::errors::{RecorderError, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tracing::debug;

/// Capacity used when the caller does not choose one
pub const DEFAULT_CAPACITY: usize = 1_000;

const DEFAULT_NON_ZERO_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CAPACITY) {
    Some(capacity) => capacity,
    None => panic!("DEFAULT_CAPACITY must be non-zero"),
};

static GLOBAL: Lazy<RecorderRegistry> = Lazy::new(RecorderRegistry::new);

/// Recorder factory remembering the last recorder it built
pub struct RecorderRegistry {
    default_capacity: NonZeroUsize,
    start_recording: bool,
    last: Mutex<Option<SharedRecorder>>,
}

impl RecorderRegistry {
    /// Registry using [`DEFAULT_CAPACITY`] and building stopped recorders
    pub fn new() -> Self {
        Self {
            default_capacity: DEFAULT_NON_ZERO_CAPACITY,
            start_recording: false,
            last: Mutex::new(None),
        }
    }

    /// Registry using the configured capacity and auto-start flag
    pub fn from_config(config: &RecorderConfig) -> Result<Self> {
        config.validate()?;
        let default_capacity = NonZeroUsize::new(config.capacity).ok_or_else(|| {
            RecorderError::InvalidConfiguration("capacity must be at least 1".to_string())
        })?;

        Ok(Self {
            default_capacity,
            start_recording: config.start_recording,
            last: Mutex::new(None),
        })
    }

    /// Process-wide registry
    pub fn global() -> &'static RecorderRegistry {
        &GLOBAL
    }

    pub fn default_capacity(&self) -> usize {
        self.default_capacity.get()
    }

    /// New recorder with the registry's default capacity
    pub fn recorder(&self) -> SharedRecorder {
        self.remember(SharedRecorder::with_capacity(self.default_capacity))
    }

    /// New recorder holding at most `capacity` entries
    pub fn recorder_with_capacity(&self, capacity: usize) -> Result<SharedRecorder> {
        Ok(self.remember(SharedRecorder::new(capacity)?))
    }

    /// The recorder most recently built by this registry
    pub fn last_recorder(&self) -> Result<SharedRecorder> {
        self.last.lock().clone().ok_or_else(|| {
            RecorderError::illegal_use("last_recorder() called before any recorder was constructed")
        })
    }

    /// In-memory text sink titled `title`
    pub fn string_dumper(&self, title: &str) -> TextDumpSink {
        TextDumpSink::new(title)
    }

    fn remember(&self, recorder: SharedRecorder) -> SharedRecorder {
        if self.start_recording {
            recorder.start_recording();
        }

        debug!(
            capacity = recorder.lock().capacity(),
            "Registered new recorder"
        );
        *self.last.lock() = Some(recorder.clone());

        recorder
    }
}

impl Default for RecorderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
