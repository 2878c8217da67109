use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::TrackerMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for tracker metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// or forwarded to an OpenTelemetry collector. Write errors are ignored.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<TrackerMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TrackerMetricsSnapshot) {
        let counters = [
            ("get_calls_total", snapshot.get_calls),
            ("get_hits_total", snapshot.get_hits),
            ("get_misses_total", snapshot.get_misses),
            ("lru_evictions_total", snapshot.lru_evictions),
            ("stale_evictions_total", snapshot.stale_evictions),
            ("removals_total", snapshot.removals),
            ("sweep_calls_total", snapshot.sweep_calls),
            ("sweeps_throttled_total", snapshot.sweeps_throttled),
            ("sweeps_run_total", snapshot.sweeps_run),
            ("releases_total", snapshot.releases),
        ];
        for (suffix, value) in counters {
            self.write_metric("counter", suffix, value);
        }

        self.write_metric("gauge", "tracked_keys", snapshot.tracked_keys as u64);
        self.write_metric("gauge", "max_keys", snapshot.max_keys as u64);
        self.write_metric("gauge", "buffer_size", snapshot.buffer_size as u64);
    }
}
