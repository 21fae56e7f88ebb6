use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so output can be scraped
/// or forwarded to an OpenTelemetry collector. Write errors are dropped;
/// metrics are observational.
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

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", &self.metric_name(suffix), value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<CacheMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &CacheMetricsSnapshot) {
        self.write_counter("find_calls_total", snapshot.find_calls);
        self.write_counter("find_hits_total", snapshot.find_hits);
        self.write_counter("find_misses_total", snapshot.find_misses);
        self.write_counter("insert_calls_total", snapshot.insert_calls);
        self.write_counter("insert_new_total", snapshot.insert_new);
        self.write_counter("insert_updates_total", snapshot.insert_updates);
        self.write_counter("insert_rejected_total", snapshot.insert_rejected);
        self.write_counter("erase_calls_total", snapshot.erase_calls);
        self.write_counter("erase_removed_total", snapshot.erase_removed);
        self.write_counter("evict_calls_total", snapshot.evict_calls);
        self.write_counter("evicted_entries_total", snapshot.evicted_entries);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}
