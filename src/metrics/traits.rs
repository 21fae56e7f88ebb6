//! # Metrics Traits
//!
//! - **Recorders** only write counters ([`CoreMetricsRecorder`] for `&mut self`
//!   paths, [`FindMetricsRecorder`] for `&self` lookups).
//! - **Providers** only read/snapshot ([`MetricsSnapshotProvider`]).
//! - **Exporters** only publish ([`MetricsExporter`]).

/// Counters for mutating cache operations.
pub trait CoreMetricsRecorder {
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_insert_rejected(&mut self);
    fn record_erase_call(&mut self);
    fn record_erase_removed(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Counters for lookups, recorded through `&self` (interior mutability).
pub trait FindMetricsRecorder {
    fn record_find_hit(&self);
    fn record_find_miss(&self);
}

/// Produces a point-in-time copy of a cache's metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publishes a snapshot to a monitoring sink.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
