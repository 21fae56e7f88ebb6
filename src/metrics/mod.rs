//! Cache metrics (feature `metrics`).
//!
//! Recording, snapshotting and export are split into small traits so the
//! engine only ever writes counters, while tests and monitoring read them.
//!
//! ```text
//!   Cache ──record──► CacheMetrics ──snapshot──► CacheMetricsSnapshot
//!                                                      │
//!                                                      ▼
//!                                          PrometheusTextExporter<W>
//! ```

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::CacheMetrics;
pub use snapshot::CacheMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, FindMetricsRecorder, MetricsExporter, MetricsSnapshotProvider};
