use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::snapshot::RankingMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for ranking metrics snapshots.
///
/// Writes the Prometheus text exposition format, so the output can be served
/// on a scrape endpoint or forwarded to an OpenTelemetry collector.
///
/// # Example
///
/// ```
/// use iprank::metrics::exporter::PrometheusTextExporter;
/// use iprank::metrics::snapshot::RankingMetricsSnapshot;
/// use iprank::metrics::traits::MetricsExporter;
///
/// let exporter = PrometheusTextExporter::new("iprank", Vec::new());
/// exporter.export(&RankingMetricsSnapshot { observe_calls: 3, ..Default::default() });
///
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("iprank_observe_calls_total 3"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<RankingMetricsSnapshot>
    for PrometheusTextExporter<W>
{
    fn export(&self, snapshot: &RankingMetricsSnapshot) {
        self.write_counter("observe_calls_total", snapshot.observe_calls);
        self.write_counter("new_keys_total", snapshot.new_keys);
        self.write_counter("rank_refreshes_total", snapshot.rank_refreshes);
        self.write_counter("rank_inserts_total", snapshot.rank_inserts);
        self.write_counter("rank_replacements_total", snapshot.rank_replacements);
        self.write_counter("rank_rejections_total", snapshot.rank_rejections);
        self.write_counter("clears_total", snapshot.clears);
        self.write_gauge("tracked_len", snapshot.tracked_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
        self.write_gauge("distinct_keys", snapshot.distinct_keys as u64);
        self.write_gauge("total_observations", snapshot.total_observations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(prefix: &str, snapshot: &RankingMetricsSnapshot) -> String {
        let exporter = PrometheusTextExporter::new(prefix, Vec::new());
        exporter.export(snapshot);
        String::from_utf8(exporter.into_inner()).unwrap()
    }

    #[test]
    fn writes_counters_and_gauges_with_type_lines() {
        let snapshot = RankingMetricsSnapshot {
            observe_calls: 17,
            rank_inserts: 6,
            tracked_len: 6,
            capacity: 100,
            ..Default::default()
        };
        let text = render("iprank", &snapshot);

        assert!(text.contains("# TYPE iprank_observe_calls_total counter\n"));
        assert!(text.contains("iprank_observe_calls_total 17\n"));
        assert!(text.contains("iprank_rank_inserts_total 6\n"));
        assert!(text.contains("# TYPE iprank_tracked_len gauge\n"));
        assert!(text.contains("iprank_capacity 100\n"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let text = render("", &RankingMetricsSnapshot::default());
        assert!(text.contains("\nclears_total 0\n"));
        assert!(!text.contains("_clears_total"));
    }

    #[test]
    fn every_metric_has_a_type_line() {
        let text = render("x", &RankingMetricsSnapshot::default());
        let types = text.lines().filter(|l| l.starts_with("# TYPE")).count();
        let values = text.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(types, 11);
        assert_eq!(values, 11);
    }
}
