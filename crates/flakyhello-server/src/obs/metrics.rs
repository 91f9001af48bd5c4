//! Metrics registry for the greeting service.
//!
//! Counter and histogram vectors with dynamic label values backed by
//! `DashMap`. Label names are fixed at construction and rendered in
//! declaration order; series are sorted by label values so scrapes are
//! deterministic. Histogram buckets are cumulative upper bounds in seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default upper bounds (seconds) used by the Prometheus client libraries.
pub const DEFAULT_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_str(names: &[&'static str], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Bucket bounds keep a trailing `.0` on whole numbers (`1.0`, not `1`).
fn format_bound(le: f64) -> String {
    if le.fract() == 0.0 {
        format!("{:.1}", le)
    } else {
        format!("{}", le)
    }
}

fn key_of(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub struct CounterVec {
    name: &'static str,
    help: &'static str,
    label_names: Vec<&'static str>,
    map: DashMap<Vec<String>, AtomicU64>,
}

impl CounterVec {
    pub fn new(name: &'static str, help: &'static str, label_names: &[&'static str]) -> Self {
        Self {
            name,
            help,
            label_names: label_names.to_vec(),
            map: DashMap::new(),
        }
    }

    /// Increment by 1. `values` pair up positionally with the label names.
    pub fn inc(&self, values: &[&str]) {
        self.add(values, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, values: &[&str], v: u64) {
        debug_assert_eq!(values.len(), self.label_names.len());
        let counter = self
            .map
            .entry(key_of(values))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value; zero for a series never observed.
    pub fn get(&self, values: &[&str]) -> u64 {
        self.map
            .get(&key_of(values))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} counter", self.name);

        let mut series: Vec<(Vec<String>, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        series.sort();

        for (key, val) in series {
            let labels = label_str(&self.label_names, &key);
            let _ = writeln!(out, "{}{{{}}} {}", self.name, labels, val);
        }
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    /// f64 sum stored as raw bits.
    sum_bits: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl AtomicHistogram {
    fn new(n_buckets: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0f64.to_bits()),
            buckets: (0..n_buckets).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn add_sum(&self, v: f64) {
        let _ = self
            .sum_bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + v).to_bits())
            });
    }

    fn sum(&self) -> f64 {
        f64::from_bits(self.sum_bits.load(Ordering::Relaxed))
    }
}

pub struct HistogramVec {
    name: &'static str,
    help: &'static str,
    label_names: Vec<&'static str>,
    bounds: Vec<f64>,
    map: DashMap<Vec<String>, AtomicHistogram>,
}

impl HistogramVec {
    pub fn new(name: &'static str, help: &'static str, label_names: &[&'static str]) -> Self {
        Self::with_buckets(name, help, label_names, &DEFAULT_BUCKETS)
    }

    pub fn with_buckets(
        name: &'static str,
        help: &'static str,
        label_names: &[&'static str],
        bounds: &[f64],
    ) -> Self {
        let mut bounds = bounds.to_vec();
        bounds.sort_by(|a, b| a.total_cmp(b));
        bounds.dedup();
        Self {
            name,
            help,
            label_names: label_names.to_vec(),
            bounds,
            map: DashMap::new(),
        }
    }

    /// Observe a value in seconds and increment cumulative buckets.
    pub fn observe(&self, values: &[&str], seconds: f64) {
        debug_assert_eq!(values.len(), self.label_names.len());
        let n = self.bounds.len();
        let hist = self
            .map
            .entry(key_of(values))
            .or_insert_with(|| AtomicHistogram::new(n));

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.add_sum(seconds);

        // Cumulative: every bucket whose bound covers the value.
        for (i, &le) in self.bounds.iter().enumerate() {
            if seconds <= le {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn observe_duration(&self, values: &[&str], elapsed: Duration) {
        self.observe(values, elapsed.as_secs_f64());
    }

    /// Number of observations; zero for a series never observed.
    pub fn count(&self, values: &[&str]) -> u64 {
        self.map
            .get(&key_of(values))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn sum(&self, values: &[&str]) -> f64 {
        self.map.get(&key_of(values)).map(|h| h.sum()).unwrap_or(0.0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} histogram", self.name);

        let mut keys: Vec<Vec<String>> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        for key in keys {
            let Some(hist) = self.map.get(&key) else {
                continue;
            };
            let labels = label_str(&self.label_names, &key);
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };

            for (i, &le) in self.bounds.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(
                    out,
                    "{}_bucket{{{}le=\"{}\"}} {}",
                    self.name,
                    prefix,
                    format_bound(le),
                    count
                );
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", self.name, prefix, count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", self.name, labels, hist.sum());
            let _ = writeln!(out, "{}_count{{{}}} {}", self.name, labels, count);
        }
    }
}

/// Request metrics for the greeting endpoint.
pub struct HttpMetrics {
    pub requests: CounterVec,
    pub latency: HistogramVec,
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self {
            requests: CounterVec::new(
                "http_requests_total",
                "Total HTTP Requests",
                &["method", "endpoint", "status"],
            ),
            latency: HistogramVec::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
                &["method", "endpoint"],
            ),
        }
    }
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One counter increment and one latency observation, same (method, endpoint).
    pub fn record(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        self.requests.inc(&[method, endpoint, &status]);
        self.latency.observe_duration(&[method, endpoint], elapsed);
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests.render(&mut out);
        self.latency.render(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counter_is_lazy_and_keyed_by_labels() {
        let c = CounterVec::new("t_total", "test", &["method", "status"]);
        assert_eq!(c.get(&["GET", "200"]), 0);
        c.inc(&["GET", "200"]);
        c.inc(&["GET", "200"]);
        c.inc(&["GET", "500"]);
        assert_eq!(c.get(&["GET", "200"]), 2);
        assert_eq!(c.get(&["GET", "500"]), 1);
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let h = HistogramVec::with_buckets("t_seconds", "test", &["path"], &[0.1, 1.0]);
        h.observe(&["/"], 0.05);
        h.observe(&["/"], 0.5);
        h.observe(&["/"], 3.0);

        let mut out = String::new();
        h.render(&mut out);
        assert!(out.contains("t_seconds_bucket{path=\"/\",le=\"0.1\"} 1\n"));
        assert!(out.contains("t_seconds_bucket{path=\"/\",le=\"1.0\"} 2\n"));
        assert!(out.contains("t_seconds_bucket{path=\"/\",le=\"+Inf\"} 3\n"));
        assert!(out.contains("t_seconds_count{path=\"/\"} 3\n"));
        assert_eq!(h.count(&["/"]), 3);
        assert!((h.sum(&["/"]) - 3.55).abs() < 1e-9);
    }

    #[test]
    fn label_values_are_escaped() {
        let c = CounterVec::new("t_total", "test", &["path"]);
        c.inc(&["a\"b\\c\nd"]);
        let mut out = String::new();
        c.render(&mut out);
        assert!(out.contains(r#"t_total{path="a\"b\\c\nd"} 1"#));
    }

    #[test]
    fn render_has_help_and_type_even_when_empty() {
        let m = HttpMetrics::new();
        let out = m.render();
        assert!(out.contains("# HELP http_requests_total Total HTTP Requests\n"));
        assert!(out.contains("# TYPE http_requests_total counter\n"));
        assert!(out.contains("# HELP http_request_duration_seconds HTTP request latency in seconds\n"));
        assert!(out.contains("# TYPE http_request_duration_seconds histogram\n"));
        assert!(!out.contains("_count{"));
    }

    #[test]
    fn record_pairs_counter_and_histogram() {
        let m = HttpMetrics::new();
        m.record("GET", "/", 200, Duration::from_millis(2));
        m.record("GET", "/", 500, Duration::from_millis(3));

        assert_eq!(m.requests.get(&["GET", "/", "200"]), 1);
        assert_eq!(m.requests.get(&["GET", "/", "500"]), 1);
        assert_eq!(m.latency.count(&["GET", "/"]), 2);

        let out = m.render();
        assert!(out.contains("http_requests_total{method=\"GET\",endpoint=\"/\",status=\"200\"} 1\n"));
        assert!(out.contains("http_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/\",le=\"0.005\"} 2\n"));
        assert!(out.contains("http_request_duration_seconds_count{method=\"GET\",endpoint=\"/\"} 2\n"));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let m = Arc::new(HttpMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = Arc::clone(&m);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        m.record("GET", "/", 200, Duration::from_micros(10));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(m.requests.get(&["GET", "/", "200"]), 8_000);
        assert_eq!(m.latency.count(&["GET", "/"]), 8_000);
        assert!((m.latency.sum(&["GET", "/"]) - 0.08).abs() < 1e-6);
    }
}
