//! Counters for lookup traffic.
//!
//! Tracks host attempts and failures, how often the fallback host rescued a
//! search, and cache effectiveness. All counters are shared across clones.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector shared by the search client and lookup service.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    /// Completed `search` calls, successful or not
    searches_total: AtomicU64,
    /// Searches that ended with a failed envelope
    searches_failed_total: AtomicU64,
    /// Individual host requests
    host_attempts_total: AtomicU64,
    /// Host requests that failed or timed out
    host_failures_total: AtomicU64,
    /// Host requests that hit the deadline
    host_timeouts_total: AtomicU64,
    /// Searches answered by a host other than the first
    fallback_hosts_used_total: AtomicU64,
    /// Total duration of all host requests in milliseconds
    host_duration_total_ms: AtomicU64,
    cache_hits_total: AtomicU64,
    cache_misses_total: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Counters::default()),
        }
    }

    /// Record one host request and its outcome.
    pub fn record_host_attempt(&self, duration: Duration, failed: bool, timed_out: bool) {
        let c = &self.inner;
        c.host_attempts_total.fetch_add(1, Ordering::Relaxed);
        c.host_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
        if failed {
            c.host_failures_total.fetch_add(1, Ordering::Relaxed);
        }
        if timed_out {
            c.host_timeouts_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a finished search. `host_index` is the position of the host that answered.
    pub fn record_search(&self, success: bool, host_index: Option<usize>) {
        let c = &self.inner;
        c.searches_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            c.searches_failed_total.fetch_add(1, Ordering::Relaxed);
        }
        if matches!(host_index, Some(i) if i > 0) {
            c.fallback_hosts_used_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_cache_access(&self, hit: bool) {
        let counter = if hit {
            &self.inner.cache_hits_total
        } else {
            &self.inner.cache_misses_total
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn searches_total(&self) -> u64 {
        self.inner.searches_total.load(Ordering::Relaxed)
    }

    pub fn host_attempts_total(&self) -> u64 {
        self.inner.host_attempts_total.load(Ordering::Relaxed)
    }

    pub fn host_failures_total(&self) -> u64 {
        self.inner.host_failures_total.load(Ordering::Relaxed)
    }

    pub fn fallback_hosts_used_total(&self) -> u64 {
        self.inner.fallback_hosts_used_total.load(Ordering::Relaxed)
    }

    /// Get average host request duration in milliseconds.
    pub fn host_duration_avg_ms(&self) -> f64 {
        let total = self.inner.host_duration_total_ms.load(Ordering::Relaxed);
        let count = self.host_attempts_total();
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        let c = &self.inner;
        MetricsSummary {
            searches_total: c.searches_total.load(Ordering::Relaxed),
            searches_failed_total: c.searches_failed_total.load(Ordering::Relaxed),
            host_attempts_total: c.host_attempts_total.load(Ordering::Relaxed),
            host_failures_total: c.host_failures_total.load(Ordering::Relaxed),
            host_timeouts_total: c.host_timeouts_total.load(Ordering::Relaxed),
            fallback_hosts_used_total: c.fallback_hosts_used_total.load(Ordering::Relaxed),
            host_duration_avg_ms: self.host_duration_avg_ms(),
            cache_hits_total: c.cache_hits_total.load(Ordering::Relaxed),
            cache_misses_total: c.cache_misses_total.load(Ordering::Relaxed),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub searches_total: u64,
    pub searches_failed_total: u64,
    pub host_attempts_total: u64,
    pub host_failures_total: u64,
    pub host_timeouts_total: u64,
    pub fallback_hosts_used_total: u64,
    pub host_duration_avg_ms: f64,
    pub cache_hits_total: u64,
    pub cache_misses_total: u64,
}
