//! Gateway Statistics Module
//!
//! Request-level counters kept by the coordinator, on top of the cache's own
//! hit/miss statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

// == Gateway Stats ==
/// Lock-free counters updated on every chat request.
#[derive(Debug, Default)]
pub struct GatewayStats {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    fresh_responses: AtomicU64,
    throttled: AtomicU64,
    upstream_errors: AtomicU64,
    upstream_ms: AtomicU64,
    time_saved_ms: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayCounters {
    pub requests: u64,
    pub cache_hits: u64,
    pub fresh_responses: u64,
    pub throttled: u64,
    pub upstream_errors: u64,
    /// Total time spent waiting on the upstream
    pub total_upstream_ms: u64,
    /// Upstream time avoided by serving from cache
    pub total_time_saved_ms: u64,
    pub avg_upstream_ms: f64,
    pub avg_time_saved_per_hit_ms: f64,
}

impl GatewayStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// A request answered from cache, saving the latency it originally cost.
    pub fn record_cache_hit(&self, saved: Duration) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        self.time_saved_ms.fetch_add(millis(saved), Ordering::Relaxed);
    }

    pub fn record_fresh(&self, upstream_latency: Duration) {
        self.fresh_responses.fetch_add(1, Ordering::Relaxed);
        self.upstream_ms.fetch_add(millis(upstream_latency), Ordering::Relaxed);
    }

    pub fn record_throttled(&self) {
        self.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_error(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GatewayCounters {
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let fresh_responses = self.fresh_responses.load(Ordering::Relaxed);
        let total_upstream_ms = self.upstream_ms.load(Ordering::Relaxed);
        let total_time_saved_ms = self.time_saved_ms.load(Ordering::Relaxed);

        GatewayCounters {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits,
            fresh_responses,
            throttled: self.throttled.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            total_upstream_ms,
            total_time_saved_ms,
            avg_upstream_ms: average(total_upstream_ms, fresh_responses),
            avg_time_saved_per_hit_ms: average(total_time_saved_ms, cache_hits),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
