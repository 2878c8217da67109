/// Point-in-time copy of tracker counters plus gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackerMetricsSnapshot {
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

    // gauges captured at snapshot time
    pub tracked_keys: usize,
    pub max_keys: usize,
    pub buffer_size: usize,
}
