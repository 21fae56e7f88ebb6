use crate::metrics::metrics_impl::CacheMetrics;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub find_calls: u64,
    pub find_hits: u64,
    pub find_misses: u64,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub insert_rejected: u64, // mode forbade the mutation

    pub erase_calls: u64,
    pub erase_removed: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,

    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl CacheMetricsSnapshot {
    pub(crate) fn capture(metrics: &CacheMetrics, cache_len: usize, capacity: usize) -> Self {
        Self {
            find_calls: metrics.find_calls.get(),
            find_hits: metrics.find_hits.get(),
            find_misses: metrics.find_misses.get(),
            insert_calls: metrics.insert_calls,
            insert_new: metrics.insert_new,
            insert_updates: metrics.insert_updates,
            insert_rejected: metrics.insert_rejected,
            erase_calls: metrics.erase_calls,
            erase_removed: metrics.erase_removed,
            evict_calls: metrics.evict_calls,
            evicted_entries: metrics.evicted_entries,
            clear_calls: metrics.clear_calls,
            cache_len,
            capacity,
        }
    }

    /// Fraction of `find` calls that hit; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.find_calls == 0 {
            0.0
        } else {
            self.find_hits as f64 / self.find_calls as f64
        }
    }
}
