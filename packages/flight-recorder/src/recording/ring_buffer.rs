// packages/flight-recorder/src/recording/ring_buffer.rs
//! Fixed-capacity circular buffer with overwrite-oldest eviction
//!
//! O(1) `put`, `peek_at` and `pop_oldest`. Capacity never changes after
//! construction. When the buffer is full, `put` evicts the oldest entry and
//! bumps the loss counter, so an under-provisioned buffer is detectable
//! without looking at timestamps.
//!
//! ```text
//!  start             end
//!    ↓                ↓
//! [ e3 ][ e4 ][ e5 ][ e6 ][ -- ]      count = 4, capacity = 5
//! ```

use crate::utils::errors::{RecorderError, Result};
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

/// Bounded ring of `T` that overwrites its oldest entry when full
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    /// Backing slots; `None` marks an unused slot
    slots: Box<[Option<T>]>,

    /// Entries currently held (0..=capacity)
    count: usize,

    /// Slot of the logically oldest entry
    start: usize,

    /// Slot of the logically newest entry
    end: usize,

    /// Entries evicted since construction or the last reset
    lost: u64,
}

impl<T> CircularBuffer<T> {
    /// Create a buffer holding at most `capacity` entries
    ///
    /// Fails with `InvalidConfiguration` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            RecorderError::InvalidConfiguration(
                "circular buffer capacity must be at least 1".to_string(),
            )
        })?;

        Ok(Self::with_capacity(capacity))
    }

    /// Create a buffer from a capacity that is already known to be non-zero
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let slots = (0..capacity.get()).map(|_| None).collect();

        Self {
            slots,
            count: 0,
            start: 0,
            end: 0,
            lost: 0,
        }
    }

    /// Insert at the logical end, returning the evicted oldest entry if the
    /// buffer was full
    pub fn put(&mut self, item: T) -> Option<T> {
        if self.count == 0 {
            // First entry lands on the start slot; end is re-synced to it so
            // a buffer drained by pops stays consistent.
            self.slots[self.start] = Some(item);
            self.end = self.start;
            self.count = 1;
            return None;
        }

        let full = self.count == self.capacity();
        if full {
            self.start = self.wrap(self.start + 1);
            self.lost += 1;
        } else {
            self.count += 1;
        }

        self.end = self.wrap(self.end + 1);
        let previous = std::mem::replace(&mut self.slots[self.end], Some(item));

        if full {
            previous
        } else {
            None
        }
    }

    /// Borrow the entry at `index`, counted from the oldest (0) to the
    /// newest (`count() - 1`)
    pub fn peek_at(&self, index: usize) -> Result<&T> {
        let out_of_range = RecorderError::OutOfRange {
            index,
            count: self.count,
        };

        if index >= self.count {
            return Err(out_of_range);
        }

        self.slots[self.wrap(self.start + index)]
            .as_ref()
            .ok_or(out_of_range)
    }

    /// Remove and return the oldest entry
    pub fn pop_oldest(&mut self) -> Result<T> {
        if self.count == 0 {
            return Err(RecorderError::EmptyBuffer);
        }

        let item = self.slots[self.start]
            .take()
            .ok_or(RecorderError::EmptyBuffer)?;

        self.count -= 1;
        self.start = self.wrap(self.start + 1);

        Ok(item)
    }

    /// Drop every entry and reset all positions and the loss counter
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }

        self.count = 0;
        self.start = 0;
        self.end = 0;
        self.lost = 0;
    }

    /// Number of entries currently held
    pub fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Entries evicted since construction or the last reset
    pub fn lost_count(&self) -> u64 {
        self.lost
    }

    /// Zero the loss counter without touching stored entries
    pub fn clear_lost_count(&mut self) {
        self.lost = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Iterate from the oldest to the newest entry without consuming them
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            front: 0,
            back: self.count,
        }
    }

    /// Snapshot of occupancy and loss
    pub fn stats(&self) -> BufferStats {
        BufferStats {
            count: self.count,
            capacity: self.capacity(),
            lost_count: self.lost,
        }
    }

    #[inline]
    fn wrap(&self, index: usize) -> usize {
        let capacity = self.capacity();
        if index >= capacity {
            index - capacity
        } else {
            index
        }
    }
}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Oldest-to-newest borrowing iterator over a [`CircularBuffer`]
#[derive(Debug)]
pub struct Iter<'a, T> {
    buffer: &'a CircularBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let index = self.front;
            self.front += 1;
            if let Ok(item) = self.buffer.peek_at(index) {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            self.back -= 1;
            if let Ok(item) = self.buffer.peek_at(self.back) {
                return Some(item);
            }
        }
        None
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Buffer occupancy statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferStats {
    /// Entries currently held
    pub count: usize,

    /// Maximum entries
    pub capacity: usize,

    /// Entries evicted since the last reset
    pub lost_count: u64,
}

impl BufferStats {
    /// Calculate fill percentage
    pub fn fill_percentage(&self) -> f64 {
        (self.count as f64 / self.capacity as f64) * 100.0
    }

    /// True once any entry has been evicted
    pub fn is_lossy(&self) -> bool {
        self.lost_count > 0
    }
}
