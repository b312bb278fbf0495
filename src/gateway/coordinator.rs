//! Chat Gateway Module
//!
//! Wires the cache, the rate limiter and the memory guard around an upstream
//! generator. Per request: fingerprint, cache lookup, admission on a miss,
//! upstream call, store, counters. No component lock is held while the
//! upstream call is in flight.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{fingerprint_params, Cache, CacheStats, Fingerprint, Params};
use crate::clock::SharedClock;
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::gateway::{GatewayCounters, GatewayStats, Generator};
use crate::limiter::{Admission, LimiterStatus, RateLimiter};
use crate::memory::{MemoryGuard, MemoryStatus};

/// The response cache as the gateway uses it.
pub type ResponseCache = Cache<Fingerprint, CachedResponse>;

// == Cached Response ==
/// What the gateway stores per fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedResponse {
    pub response: String,
    /// How long the upstream took to produce it
    pub original_latency_ms: u64,
    pub cached_at: DateTime<Utc>,
    pub prompt: String,
}

// == Reply ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Cache,
    Upstream,
}

/// A successful answer to a chat request.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub source: ReplySource,
    pub fingerprint: Fingerprint,
    /// Time spent inside the gateway for this request
    pub elapsed: Duration,
    pub cached_at: DateTime<Utc>,
}

// == Snapshot ==
/// Everything the gateway knows about itself, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct GatewaySnapshot {
    pub gateway: GatewayCounters,
    pub cache: CacheStats,
    pub rate_limit: LimiterStatus,
    pub memory: MemoryStatus,
    pub generator: String,
}

// == Chat Gateway ==
pub struct ChatGateway {
    cache: Arc<ResponseCache>,
    limiter: RateLimiter,
    guard: Arc<MemoryGuard>,
    generator: Arc<dyn Generator>,
    stats: GatewayStats,
}

impl ChatGateway {
    // == Constructors ==
    /// Assembles a gateway from already-built components.
    pub fn new(
        cache: Arc<ResponseCache>,
        limiter: RateLimiter,
        guard: Arc<MemoryGuard>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            cache,
            limiter,
            guard,
            generator,
            stats: GatewayStats::new(),
        }
    }

    /// Builds every component from configuration.
    ///
    /// # Errors
    /// `GateError::Config` when any configured limit is unusable.
    pub fn from_config(
        config: &Config,
        generator: Arc<dyn Generator>,
        clock: SharedClock,
    ) -> Result<Self> {
        let cache = Arc::new(ResponseCache::new(
            config.cache_max_entries,
            Duration::from_secs(config.cache_ttl),
            clock.clone(),
        )?);
        let limiter = RateLimiter::per_period(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_period),
            clock,
        )?
        .with_hourly_quota(config.rate_limit_hour_requests)?;
        let guard = Arc::new(MemoryGuard::with_threshold_mb(
            config.memory_threshold_mb,
            &cache,
        )?);

        Ok(Self::new(cache, limiter, guard, generator))
    }

    // == Respond ==
    /// Answers a chat request from cache or, if admitted, from the upstream.
    ///
    /// # Errors
    /// - `GateError::InvalidRequest` for an empty prompt
    /// - `GateError::RateLimited` when the miss cannot be admitted
    /// - `GateError::Upstream` when the generator fails; nothing is cached and
    ///   the admission token stays spent
    pub async fn respond(&self, prompt: &str, params: &Params) -> Result<ChatReply> {
        let started = Instant::now();

        if prompt.trim().is_empty() {
            return Err(GateError::InvalidRequest("message cannot be empty".to_string()));
        }
        self.stats.record_request();

        let key = fingerprint_params(prompt, params);

        if let Some(hit) = self.cache.get(&key) {
            self.stats
                .record_cache_hit(Duration::from_millis(hit.original_latency_ms));
            debug!(key = %key.short(), "Cache hit");
            return Ok(ChatReply {
                response: hit.response,
                source: ReplySource::Cache,
                fingerprint: key,
                elapsed: started.elapsed(),
                cached_at: hit.cached_at,
            });
        }
        debug!(key = %key.short(), "Cache miss");

        if let Admission::Denied { retry_after } = self.limiter.check() {
            self.stats.record_throttled();
            warn!(
                key = %key.short(),
                retry_after_secs = retry_after.as_secs_f64(),
                "Rate limit reached"
            );
            return Err(GateError::RateLimited {
                retry_after_secs: retry_after.as_secs_f64(),
            });
        }

        let upstream_started = Instant::now();
        let response = match self.generator.generate(prompt, params).await {
            Ok(response) => response,
            Err(err) => {
                self.stats.record_upstream_error();
                warn!(key = %key.short(), error = %err, "Upstream generation failed");
                return Err(GateError::Upstream(err.to_string()));
            }
        };
        let upstream_latency = upstream_started.elapsed();

        let cached_at = Utc::now();
        self.cache.put(
            key,
            CachedResponse {
                response: response.clone(),
                original_latency_ms: u64::try_from(upstream_latency.as_millis())
                    .unwrap_or(u64::MAX),
                cached_at,
                prompt: prompt.to_string(),
            },
        );
        self.stats.record_fresh(upstream_latency);
        info!(
            key = %key.short(),
            latency_ms = upstream_latency.as_millis() as u64,
            response_length = response.len(),
            "Response cached"
        );

        Ok(ChatReply {
            response,
            source: ReplySource::Upstream,
            fingerprint: key,
            elapsed: started.elapsed(),
            cached_at,
        })
    }

    // == Maintenance ==
    /// Empties the response cache.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    /// Drops expired responses.
    pub fn evict_expired(&self) -> usize {
        self.cache.evict_expired()
    }

    // == Accessors ==
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn guard(&self) -> &Arc<MemoryGuard> {
        &self.guard
    }

    pub fn snapshot(&self) -> GatewaySnapshot {
        GatewaySnapshot {
            gateway: self.stats.snapshot(),
            cache: self.cache.stats_snapshot(),
            rate_limit: self.limiter.status(),
            memory: self.guard.status(),
            generator: self.generator.name().to_string(),
        }
    }
}
