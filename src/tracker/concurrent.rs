//! Thread-safe buffer tracker.
//!
//! ## Concurrency Model
//!
//! ```text
//!   logging thread 1     logging thread 2     housekeeping
//!      │ get("a", t)        │ record("b", t, e)   │ clear_stale_buffers(now)
//!      ▼                    ▼                     ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │              parking_lot::RwLock<TrackerCore>            │
//!   │                                                          │
//!   │  get / record / sweep / remove / set_max_keys → WRITE    │
//!   │  keys / number_of_keys / peek / contains      → READ     │
//!   └──────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//!   BufferHandle (Arc<Mutex<RingBuffer>>), appended to outside the tracker
//!   lock by `get` callers, inside it by `record`
//! ```
//!
//! Every path that can relink the recency list or evict takes the write
//! lock, so no caller ever observes a half-linked entry. Lock order is always
//! tracker lock, then buffer lock; handles never call back into the tracker.

use std::time::Duration;

use parking_lot::RwLock;

use crate::builder::TrackerConfig;
use crate::error::{ConfigError, InvariantError, Result};
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::TrackerMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MetricsReset, MetricsSnapshotProvider};
use crate::tracker::core::TrackerCore;
use crate::tracker::handle::BufferHandle;
use crate::traits::{ConcurrentTracker, CyclicBufferTracker};

/// [`TrackerCore`] behind a single `parking_lot::RwLock`.
///
/// Share it between threads with `Arc<BufferTracker<E>>`. Dropping the last
/// reference (or calling [`close`](Self::close)) clears every buffer.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use ringtrack::builder::TrackerBuilder;
///
/// let tracker = Arc::new(TrackerBuilder::new().buffer_size(8).build::<u64>());
/// let workers: Vec<_> = (0..4u64)
///     .map(|n| {
///         let tracker = Arc::clone(&tracker);
///         thread::spawn(move || {
///             tracker.record(&format!("thread-{}", n), n, n).unwrap();
///         })
///     })
///     .collect();
/// for w in workers {
///     w.join().unwrap();
/// }
/// assert_eq!(tracker.number_of_keys(), 4);
/// ```
#[derive(Debug)]
pub struct BufferTracker<E> {
    inner: RwLock<TrackerCore<E>>,
}

impl<E> BufferTracker<E> {
    /// Creates a tracker from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn try_new(config: TrackerConfig) -> std::result::Result<Self, ConfigError> {
        TrackerCore::try_new(config).map(Self::from_core)
    }

    /// Creates a tracker.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid.
    pub fn new(config: TrackerConfig) -> Self {
        Self::from_core(TrackerCore::new(config))
    }

    /// Wraps an existing core.
    pub fn from_core(core: TrackerCore<E>) -> Self {
        Self {
            inner: RwLock::new(core),
        }
    }

    /// Unwraps the core without releasing its buffers.
    pub fn into_inner(self) -> TrackerCore<E> {
        self.inner.into_inner()
    }

    /// Returns the buffer for `key`, creating it if needed; see
    /// [`CyclicBufferTracker::get`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidKey`](crate::error::BufferError::InvalidKey)
    /// for an empty key.
    pub fn get(&self, key: &str, timestamp: u64) -> Result<BufferHandle<E>> {
        self.inner.write().get(key, timestamp)
    }

    /// Looks up `key` and appends `event` to its buffer in one critical
    /// section, so the event cannot land in a buffer evicted in between.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidKey`](crate::error::BufferError::InvalidKey)
    /// for an empty key; `event` is dropped.
    pub fn record(&self, key: &str, timestamp: u64, event: E) -> Result<()> {
        let mut core = self.inner.write();
        let handle = core.get(key, timestamp)?;
        handle.append(event);
        Ok(())
    }

    /// Sweeps stale keys; see [`CyclicBufferTracker::clear_stale_buffers`].
    pub fn clear_stale_buffers(&self, now: u64) -> usize {
        self.inner.write().clear_stale_buffers(now)
    }

    pub fn number_of_keys(&self) -> usize {
        self.inner.read().number_of_keys()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Tracked keys, least recently used first.
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().keys()
    }

    pub fn peek(&self, key: &str) -> Option<BufferHandle<E>> {
        self.inner.read().peek(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().contains(key)
    }

    pub fn last_touched(&self, key: &str) -> Option<u64> {
        self.inner.read().last_touched(key)
    }

    pub fn last_sweep_at(&self) -> u64 {
        self.inner.read().last_sweep_at()
    }

    /// Stops tracking `key`; see [`TrackerCore::remove`].
    pub fn remove(&self, key: &str) -> bool {
        self.inner.write().remove(key)
    }

    pub fn buffer_size(&self) -> usize {
        self.inner.read().buffer_size()
    }

    pub fn max_keys(&self) -> usize {
        self.inner.read().max_keys()
    }

    /// Changes the key bound on the live tracker.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `max_keys` is zero.
    pub fn set_max_keys(&self, max_keys: usize) -> std::result::Result<(), ConfigError> {
        self.inner.write().set_max_keys(max_keys)
    }

    pub fn staleness_threshold(&self) -> Duration {
        self.inner.read().staleness_threshold()
    }

    pub fn sweep_interval(&self) -> Duration {
        self.inner.read().sweep_interval()
    }

    /// Clears every buffer and forgets every key.
    pub fn release_all(&self) {
        self.inner.write().release_all();
    }

    /// Releases every buffer and consumes the tracker.
    pub fn close(self) {
        self.release_all();
    }

    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }
}

impl<E: Send> ConcurrentTracker for BufferTracker<E> {}

#[cfg(feature = "metrics")]
impl<E> MetricsSnapshotProvider<TrackerMetricsSnapshot> for BufferTracker<E> {
    fn snapshot(&self) -> TrackerMetricsSnapshot {
        self.inner.read().snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<E> BufferTracker<E> {
    /// Zeroes the tracker's counters.
    pub fn reset_metrics(&self) {
        self.inner.write().reset_metrics();
    }
}
