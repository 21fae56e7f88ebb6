use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{CoreMetricsRecorder, FindMetricsRecorder};

/// Per-cache operation counters.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub find_calls: MetricsCell,
    pub find_hits: MetricsCell,
    pub find_misses: MetricsCell,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub insert_rejected: u64,

    pub erase_calls: u64,
    pub erase_removed: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,

    pub clear_calls: u64,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        self.find_calls.reset();
        self.find_hits.reset();
        self.find_misses.reset();
        self.insert_calls = 0;
        self.insert_new = 0;
        self.insert_updates = 0;
        self.insert_rejected = 0;
        self.erase_calls = 0;
        self.erase_removed = 0;
        self.evict_calls = 0;
        self.evicted_entries = 0;
        self.clear_calls = 0;
    }
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }
    fn record_insert_rejected(&mut self) {
        self.insert_rejected += 1;
    }
    fn record_erase_call(&mut self) {
        self.erase_calls += 1;
    }
    fn record_erase_removed(&mut self) {
        self.erase_removed += 1;
    }
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl FindMetricsRecorder for CacheMetrics {
    fn record_find_hit(&self) {
        self.find_calls.incr();
        self.find_hits.incr();
    }
    fn record_find_miss(&self) {
        self.find_calls.incr();
        self.find_misses.incr();
    }
}
