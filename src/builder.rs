//! Tracker configuration and builder.
//!
//! Every setting is fixed at construction except `max_keys`, which can be
//! adjusted on a live tracker.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use ringtrack::builder::TrackerBuilder;
//!
//! let tracker = TrackerBuilder::new()
//!     .buffer_size(32)
//!     .max_keys(16)
//!     .staleness_threshold(Duration::from_secs(600))
//!     .build::<String>();
//!
//! let buffer = tracker.get("request-42", 1_000).unwrap();
//! buffer.append("connection reset".to_string());
//! assert_eq!(tracker.number_of_keys(), 1);
//! ```

use std::time::Duration;

use crate::error::ConfigError;
use crate::tracker::{BufferTracker, TrackerCore};

/// Default capacity of each per-key ring buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// Default bound on distinct tracked keys.
pub const DEFAULT_MAX_KEYS: usize = 64;

/// Default age after which an untouched key is swept.
pub const DEFAULT_STALENESS_THRESHOLD: Duration = Duration::from_secs(30 * 60);

/// Default minimum spacing between two staleness sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Settings for a buffer tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Capacity of each per-key ring buffer.
    pub buffer_size: usize,
    /// Distinct keys retained; a new key that brings the count to this bound
    /// evicts the least-recently-used key.
    pub max_keys: usize,
    /// Keys untouched for longer than this are removed by a sweep.
    pub staleness_threshold: Duration,
    /// Sweeps closer together than this are skipped.
    pub sweep_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_keys: DEFAULT_MAX_KEYS,
            staleness_threshold: DEFAULT_STALENESS_THRESHOLD,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl TrackerConfig {
    /// Checks every field, returning the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::new("buffer_size must be > 0"));
        }
        validate_max_keys(self.max_keys)
    }
}

pub(crate) fn validate_max_keys(max_keys: usize) -> Result<(), ConfigError> {
    if max_keys == 0 {
        return Err(ConfigError::new("max_keys must be > 0"));
    }
    Ok(())
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Fluent builder for [`BufferTracker`] and [`TrackerCore`].
#[derive(Debug, Clone, Default)]
pub struct TrackerBuilder {
    config: TrackerConfig,
}

impl TrackerBuilder {
    /// Starts from the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    pub fn max_keys(mut self, max_keys: usize) -> Self {
        self.config.max_keys = max_keys;
        self
    }

    pub fn staleness_threshold(mut self, threshold: Duration) -> Self {
        self.config.staleness_threshold = threshold;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Builds a thread-safe tracker.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any setting is invalid.
    pub fn try_build<E>(self) -> Result<BufferTracker<E>, ConfigError> {
        self.try_build_core().map(BufferTracker::from_core)
    }

    /// Builds a thread-safe tracker.
    ///
    /// # Panics
    ///
    /// Panics if any setting is invalid; use [`try_build`](Self::try_build)
    /// for user-supplied configuration.
    pub fn build<E>(self) -> BufferTracker<E> {
        self.try_build()
            .unwrap_or_else(|err| panic!("invalid tracker configuration: {}", err))
    }

    /// Builds a single-threaded tracker core.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any setting is invalid.
    pub fn try_build_core<E>(self) -> Result<TrackerCore<E>, ConfigError> {
        TrackerCore::try_new(self.config)
    }

    /// Builds a single-threaded tracker core.
    ///
    /// # Panics
    ///
    /// Panics if any setting is invalid.
    pub fn build_core<E>(self) -> TrackerCore<E> {
        self.try_build_core()
            .unwrap_or_else(|err| panic!("invalid tracker configuration: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CyclicBufferTracker;

    #[test]
    fn defaults_match_documented_constants() {
        let config = TrackerConfig::default();
        assert_eq!(config.buffer_size, 256);
        assert_eq!(config.max_keys, 64);
        assert_eq!(config.staleness_threshold, Duration::from_secs(1800));
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let err = TrackerBuilder::new().buffer_size(0).try_build::<u8>().unwrap_err();
        assert!(err.message().contains("buffer_size"));
    }

    #[test]
    fn zero_max_keys_is_rejected() {
        let err = TrackerBuilder::new().max_keys(0).try_build_core::<u8>().unwrap_err();
        assert!(err.message().contains("max_keys"));
    }

    #[test]
    #[should_panic(expected = "invalid tracker configuration")]
    fn build_panics_on_invalid_config() {
        let _ = TrackerBuilder::new().buffer_size(0).build::<u8>();
    }

    #[test]
    fn builder_settings_reach_the_tracker() {
        let core = TrackerBuilder::new()
            .buffer_size(8)
            .max_keys(5)
            .staleness_threshold(Duration::from_millis(250))
            .sweep_interval(Duration::ZERO)
            .build_core::<u8>();
        assert_eq!(core.buffer_size(), 8);
        assert_eq!(core.max_keys(), 5);
        assert_eq!(core.staleness_threshold(), Duration::from_millis(250));
        assert_eq!(core.sweep_interval(), Duration::ZERO);
    }

    #[test]
    fn from_config_round_trips() {
        let config = TrackerConfig {
            buffer_size: 4,
            ..TrackerConfig::default()
        };
        let builder = TrackerBuilder::from_config(config.clone());
        assert_eq!(builder.config(), &config);
    }

    #[test]
    fn duration_millis_saturates() {
        assert_eq!(duration_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_millis(Duration::MAX), u64::MAX);
    }
}
