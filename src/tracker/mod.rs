//! Keyed ring-buffer tracking with LRU and staleness eviction.
//!
//! - [`TrackerCore`]: single-threaded tracker (index + recency list).
//! - [`BufferTracker`]: `TrackerCore` behind one `parking_lot::RwLock`.
//! - [`BufferHandle`]: cloneable lease on one key's ring buffer.
//!
//! Timestamps are caller-supplied milliseconds; the tracker never reads a
//! clock. [`current_time_millis`] is provided for callers that want wall time.

pub mod concurrent;
pub mod core;
pub mod handle;

use std::time::{SystemTime, UNIX_EPOCH};

pub use self::concurrent::BufferTracker;
pub use self::core::TrackerCore;
pub use self::handle::BufferHandle;

/// Milliseconds since the Unix epoch, or 0 if the system clock is before it.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
