pub use crate::builder::{
    DEFAULT_BUFFER_SIZE, DEFAULT_MAX_KEYS, DEFAULT_STALENESS_THRESHOLD, DEFAULT_SWEEP_INTERVAL,
    TrackerBuilder, TrackerConfig,
};
pub use crate::ds::RingBuffer;
pub use crate::error::{BufferError, ConfigError, InvariantError};
pub use crate::tracker::{BufferHandle, BufferTracker, TrackerCore, current_time_millis};
pub use crate::traits::{ConcurrentTracker, CyclicBufferTracker};
