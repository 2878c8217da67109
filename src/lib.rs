//! ringtrack: per-key bounded ring buffers with LRU and staleness eviction.
//!
//! A logging pipeline keeps a short history of recent events per context key
//! (thread, MDC value, marker) so that a triggered notification can carry the
//! activity that led up to it. The tracker bounds both the history per key
//! (ring capacity) and the number of keys (LRU eviction), and drops keys that
//! have gone quiet (throttled staleness sweep).
//!
//! ```
//! use ringtrack::prelude::*;
//!
//! let tracker = TrackerBuilder::new().buffer_size(3).max_keys(3).build::<&str>();
//! tracker.record("user-1", 10, "login").unwrap();
//! tracker.record("user-1", 11, "query").unwrap();
//! tracker.record("user-2", 12, "login").unwrap();
//!
//! let recent = tracker.peek("user-1").unwrap().to_vec();
//! assert_eq!(recent, vec!["login", "query"]);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod prelude;
pub mod tracker;
pub mod traits;

pub use crate::ds::{IntrusiveList, RingBuffer, SlotArena, SlotId};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::TrackerMetricsSnapshot;
pub use crate::tracker::{BufferHandle, BufferTracker, TrackerCore};
