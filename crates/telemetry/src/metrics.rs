//! In-process counters and histograms

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::session_id;

/// Global metrics registry
static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

/// Samples kept per histogram; older samples are discarded
const HISTOGRAM_WINDOW: usize = 1024;

/// Metric names recorded by the builder
pub mod names {
    pub const BUILDS_STARTED: &str = "builds.started";
    pub const BUILDS_SUCCEEDED: &str = "builds.succeeded";
    pub const BUILDS_FAILED: &str = "builds.failed";
    pub const KEYSTORE_SIMULATED: &str = "keystore.simulated";
    pub const RENDER_DURATION_MS: &str = "render.duration_ms";
    pub const BUILD_DURATION_MS: &str = "build.duration_ms";
}

/// Metrics registry for collecting and exporting metrics
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, AtomicU64>>,
    histograms: RwLock<HashMap<String, VecDeque<f64>>>,
    start_time: Instant,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter
    pub fn increment(&self, name: &str) {
        self.increment_by(name, 1);
    }

    /// Increment a counter by a specific amount
    pub fn increment_by(&self, name: &str, value: u64) {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(counter) = counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }
        drop(counters);

        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of a counter (0 if never incremented)
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Record a histogram sample
    pub fn histogram(&self, name: &str, value: f64) {
        let mut histograms = self.histograms.write().unwrap_or_else(PoisonError::into_inner);
        let samples = histograms.entry(name.to_string()).or_default();
        if samples.len() == HISTOGRAM_WINDOW {
            samples.pop_front();
        }
        samples.push_back(value);
    }

    /// Record a duration in milliseconds
    pub fn record_duration(&self, name: &str, duration: Duration) {
        self.histogram(name, duration.as_secs_f64() * 1000.0);
    }

    /// Statistics for one histogram
    pub fn histogram_stats(&self, name: &str) -> Option<HistogramStats> {
        let histograms = self.histograms.read().unwrap_or_else(PoisonError::into_inner);
        histograms
            .get(name)
            .map(|v| HistogramStats::from_values(v.iter().copied()))
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        let counters: BTreeMap<String, u64> = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect();

        let histograms: BTreeMap<String, HistogramStats> = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), HistogramStats::from_values(v.iter().copied())))
            .collect();

        serde_json::json!({
            "session_id": session_id(),
            "uptime_secs": self.uptime_secs(),
            "counters": counters,
            "histograms": histograms,
        })
    }
}

/// Histogram statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl HistogramStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.collect();
        if sorted.is_empty() {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                p50: 0.0,
                p95: 0.0,
                p99: 0.0,
            };
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sum / count as f64,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Get the global metrics registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// Records elapsed milliseconds into a global histogram when stopped or dropped
pub struct Timer {
    name: &'static str,
    start: Instant,
    recorded: bool,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(mut self) -> Duration {
        let duration = self.start.elapsed();
        self.record(duration);
        duration
    }

    fn record(&mut self, duration: Duration) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        metrics().record_duration(self.name, duration);
        tracing::debug!(
            metric = self.name,
            duration_ms = duration.as_millis() as u64,
            "Timer completed"
        );
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.record(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counter() {
        let registry = MetricsRegistry::new();
        registry.increment(names::BUILDS_STARTED);
        registry.increment(names::BUILDS_STARTED);
        registry.increment_by(names::BUILDS_STARTED, 3);

        assert_eq!(registry.counter(names::BUILDS_STARTED), 5);
        assert_eq!(registry.counter(names::BUILDS_FAILED), 0);
    }

    #[test]
    fn test_histogram_stats() {
        let values = vec![10.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 1.0];
        let stats = HistogramStats::from_values(values.into_iter());

        assert_eq!(stats.count, 10);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.mean, 5.5);
    }

    #[test]
    fn test_histogram_window() {
        let registry = MetricsRegistry::new();
        for i in 0..(HISTOGRAM_WINDOW + 10) {
            registry.histogram("h", i as f64);
        }
        let stats = registry.histogram_stats("h").unwrap();
        assert_eq!(stats.count, HISTOGRAM_WINDOW);
        assert_eq!(stats.min, 10.0);
    }

    #[test]
    fn test_timer_records_once() {
        let name = "test.timer_records_once";
        let timer = Timer::start(name);
        std::thread::sleep(Duration::from_millis(5));
        let duration = timer.stop();

        assert!(duration.as_millis() >= 5);
        assert_eq!(metrics().histogram_stats(name).unwrap().count, 1);
    }

    #[test]
    fn test_export_json() {
        let registry = MetricsRegistry::new();
        registry.increment(names::BUILDS_SUCCEEDED);
        registry.record_duration(names::BUILD_DURATION_MS, Duration::from_millis(40));

        let json = registry.export_json();
        assert_eq!(json["counters"][names::BUILDS_SUCCEEDED], 1);
        assert_eq!(json["histograms"][names::BUILD_DURATION_MS]["count"], 1);
        assert!(json["session_id"].is_string());
    }
}
