//! # Metrics Trait Hierarchy
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │   TrackerMetricsRecorder    │  written under the tracker lock
//!   │  get hit/miss, evictions,   │
//!   │  sweeps, removals, release  │
//!   └──────────────┬──────────────┘
//!                  │
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters recorded by the buffer tracker.
pub trait TrackerMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_lru_eviction(&mut self);
    fn record_stale_eviction(&mut self);
    fn record_removal(&mut self);
    fn record_sweep_throttled(&mut self);
    fn record_sweep_run(&mut self);
    fn record_release(&mut self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
