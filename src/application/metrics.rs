//! Process-wide service counters and their Prometheus text rendering.
//!
//! Every counter is an atomic so concurrent handlers never lose increments.
//! Increments are mirrored to the `metrics` facade for any installed
//! recorder.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use metrics::counter;

pub const METRIC_PREFIX: &str = "content_service";

pub const REQUESTS_TOTAL: &str = "content_service_requests_total";
pub const CONTENT_SERVED_TOTAL: &str = "content_service_content_served_total";
pub const CACHE_HITS_TOTAL: &str = "content_service_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "content_service_cache_misses_total";
pub const ERRORS_TOTAL: &str = "content_service_errors_total";
pub const UPTIME_SECONDS: &str = "content_service_uptime_seconds";
pub const CONTENT_TOTAL: &str = "content_service_content_total";

#[derive(Debug)]
pub struct ServiceMetrics {
    requests_total: AtomicU64,
    content_served: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    errors: AtomicU64,
    started_at: Instant,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            content_served: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        counter!(REQUESTS_TOTAL).increment(1);
    }

    pub fn record_served(&self, items: usize) {
        let items = items as u64;
        self.content_served.fetch_add(items, Ordering::Relaxed);
        counter!(CONTENT_SERVED_TOTAL).increment(items);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        counter!(CACHE_HITS_TOTAL).increment(1);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        counter!(CACHE_MISSES_TOTAL).increment(1);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        counter!(ERRORS_TOTAL).increment(1);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            content_served: self.content_served.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            uptime_seconds: self.uptime_seconds(),
        }
    }
}

/// Point-in-time copy of the service counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub content_served: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub errors: u64,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Render the Prometheus text exposition format (version 0.0.4).
    pub fn render_prometheus(&self, content_total: usize) -> String {
        let series: [(&str, &str, &str, u64); 7] = [
            (
                "requests_total",
                "counter",
                "Total requests received",
                self.requests_total,
            ),
            (
                "content_served_total",
                "counter",
                "Total content items served",
                self.content_served,
            ),
            ("cache_hits_total", "counter", "Cache hits", self.cache_hits),
            (
                "cache_misses_total",
                "counter",
                "Cache misses",
                self.cache_misses,
            ),
            ("errors_total", "counter", "Total errors", self.errors),
            (
                "uptime_seconds",
                "gauge",
                "Service uptime",
                self.uptime_seconds,
            ),
            (
                "content_total",
                "gauge",
                "Total content items available",
                content_total as u64,
            ),
        ];

        let mut out = String::new();
        for (index, (name, kind, help, value)) in series.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            // Writing into a String cannot fail.
            let _ = writeln!(out, "# HELP {METRIC_PREFIX}_{name} {help}");
            let _ = writeln!(out, "# TYPE {METRIC_PREFIX}_{name} {kind}");
            let _ = writeln!(out, "{METRIC_PREFIX}_{name} {value}");
        }
        out
    }
}
