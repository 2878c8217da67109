use crate::metrics::traits::{MetricsReset, TrackerMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct TrackerMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub lru_evictions: u64,
    pub stale_evictions: u64,
    pub removals: u64,
    pub sweep_calls: u64,
    pub sweeps_throttled: u64,
    pub sweeps_run: u64,
    pub releases: u64,
}

impl TrackerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries that left the tracker through any eviction path.
    pub fn evicted_entries(&self) -> u64 {
        self.lru_evictions + self.stale_evictions + self.removals
    }
}

impl TrackerMetricsRecorder for TrackerMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_lru_eviction(&mut self) {
        self.lru_evictions += 1;
    }

    fn record_stale_eviction(&mut self) {
        self.stale_evictions += 1;
    }

    fn record_removal(&mut self) {
        self.removals += 1;
    }

    fn record_sweep_throttled(&mut self) {
        self.sweep_calls += 1;
        self.sweeps_throttled += 1;
    }

    fn record_sweep_run(&mut self) {
        self.sweep_calls += 1;
        self.sweeps_run += 1;
    }

    fn record_release(&mut self) {
        self.releases += 1;
    }
}

impl MetricsReset for TrackerMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_and_misses_count_as_get_calls() {
        let mut m = TrackerMetrics::new();
        m.record_get_hit();
        m.record_get_miss();
        m.record_get_miss();
        assert_eq!(m.get_calls, 3);
        assert_eq!(m.get_hits, 1);
        assert_eq!(m.get_misses, 2);
    }

    #[test]
    fn sweeps_split_into_run_and_throttled() {
        let mut m = TrackerMetrics::new();
        m.record_sweep_run();
        m.record_sweep_throttled();
        m.record_sweep_throttled();
        assert_eq!(m.sweep_calls, 3);
        assert_eq!(m.sweeps_run, 1);
        assert_eq!(m.sweeps_throttled, 2);
    }

    #[test]
    fn evicted_entries_sums_all_paths_and_reset_zeroes() {
        let mut m = TrackerMetrics::new();
        m.record_lru_eviction();
        m.record_stale_eviction();
        m.record_removal();
        assert_eq!(m.evicted_entries(), 3);
        m.reset_metrics();
        assert_eq!(m.evicted_entries(), 0);
        assert_eq!(m.get_calls, 0);
    }
}
