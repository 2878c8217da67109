//! Tracker traits.
//!
//! [`CyclicBufferTracker`] is the interface an appender-like collaborator
//! programs against: look up (or create) the ring buffer for a key, and
//! periodically sweep stale keys. It takes `&mut self`, like the other
//! single-threaded cores; the lock-guarded [`BufferTracker`] exposes the same
//! operations through `&self` and is marked with [`ConcurrentTracker`].
//!
//! ```text
//!   CyclicBufferTracker<E>        ConcurrentTracker (Send + Sync marker)
//!          ▲                                ▲
//!          │                                │
//!     TrackerCore<E>  ◄──RwLock──  BufferTracker<E>
//! ```
//!
//! [`BufferTracker`]: crate::tracker::BufferTracker

use crate::error::{ConfigError, Result};
use crate::tracker::BufferHandle;

/// Keyed, bounded collection of ring buffers with recency and age eviction.
///
/// # Example
///
/// ```
/// use ringtrack::builder::TrackerBuilder;
/// use ringtrack::traits::CyclicBufferTracker;
///
/// let mut core = TrackerBuilder::new().max_keys(3).build_core::<&str>();
/// core.get("a", 1).unwrap().append("first");
/// core.get("b", 2).unwrap();
/// core.get("c", 3).unwrap(); // reaching the bound evicts "a"
/// assert_eq!(core.keys(), vec!["b", "c"]);
/// ```
pub trait CyclicBufferTracker<E> {
    /// Returns the buffer for `key`, creating it if needed, and marks the key
    /// most recently used as of `timestamp` (milliseconds).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidKey`](crate::error::BufferError::InvalidKey)
    /// for an empty key; the tracker is left unchanged.
    fn get(&mut self, key: &str, timestamp: u64) -> Result<BufferHandle<E>>;

    /// Evicts keys untouched for longer than the staleness threshold as of
    /// `now`. Calls closer than the sweep interval to the previous sweep do
    /// nothing. Returns the number of evicted keys.
    fn clear_stale_buffers(&mut self, now: u64) -> usize;

    /// Number of tracked keys.
    fn number_of_keys(&self) -> usize;

    /// Tracked keys, least recently used first.
    fn keys(&self) -> Vec<String>;

    /// Capacity of each ring buffer.
    fn buffer_size(&self) -> usize;

    /// Current bound on distinct keys.
    fn max_keys(&self) -> usize;

    /// Changes the key bound. Least recently used keys are evicted right away
    /// until fewer than `max_keys` remain, the same state an insertion that
    /// reaches the bound leaves behind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `max_keys` is zero.
    fn set_max_keys(&mut self, max_keys: usize) -> std::result::Result<(), ConfigError>;
}

/// Marker for trackers safe to share across logging threads.
pub trait ConcurrentTracker: Send + Sync {}
