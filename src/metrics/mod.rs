//! Tracker metrics (feature `metrics`).
//!
//! Recording, snapshotting, and export are separate concerns:
//!
//! - [`traits::TrackerMetricsRecorder`]: counters written by the tracker core
//!   while it holds its lock.
//! - [`traits::MetricsSnapshotProvider`]: point-in-time copy for tests and
//!   benches.
//! - [`traits::MetricsExporter`]: publishes a snapshot, e.g. through
//!   [`exporter::PrometheusTextExporter`].

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
