//! Error types for the ringtrack library.
//!
//! ## Key Components
//!
//! - [`BufferError`]: Returned by ring buffer and tracker operations when the
//!   caller passes an invalid capacity, key, or index.
//! - [`ConfigError`]: Returned when tracker configuration parameters are
//!   invalid (e.g. zero buffer size or zero key bound).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! All of these signal a mistake at the call site. None of them is transient,
//! and retrying the same call fails the same way.
//!
//! ## Example Usage
//!
//! ```
//! use ringtrack::error::{BufferError, ConfigError};
//! use ringtrack::builder::TrackerBuilder;
//!
//! let bad: Result<_, ConfigError> = TrackerBuilder::new().buffer_size(0).try_build::<u32>();
//! assert!(bad.is_err());
//!
//! let tracker = TrackerBuilder::new().build::<u32>();
//! assert_eq!(tracker.get("", 0).unwrap_err(), BufferError::InvalidKey);
//! ```

use std::fmt;

/// Result alias for ring buffer and tracker operations.
pub type Result<T> = std::result::Result<T, BufferError>;

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// Error returned by [`RingBuffer`](crate::ds::RingBuffer) and tracker calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A ring buffer was requested with a non-positive capacity.
    InvalidCapacity(usize),
    /// An empty key was passed to the tracker.
    InvalidKey,
    /// A ring buffer read addressed an element that is not retained.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::InvalidCapacity(capacity) => {
                write!(f, "ring buffer capacity must be > 0, got {}", capacity)
            },
            BufferError::InvalidKey => f.write_str("tracker key must be non-empty"),
            BufferError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for ring buffer of length {}", index, len)
            },
        }
    }
}

impl std::error::Error for BufferError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when tracker configuration parameters are invalid.
///
/// Produced by [`TrackerBuilder::try_build`](crate::builder::TrackerBuilder::try_build)
/// and [`BufferTracker::set_max_keys`](crate::tracker::BufferTracker::set_max_keys).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use ringtrack::builder::TrackerBuilder;
///
/// let err = TrackerBuilder::new().max_keys(0).try_build::<u8>().unwrap_err();
/// assert!(err.to_string().contains("max_keys"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when tracker invariants are violated.
///
/// Produced by [`TrackerCore::check_invariants`](crate::tracker::TrackerCore::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
