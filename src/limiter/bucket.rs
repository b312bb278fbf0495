//! Token Bucket Module
//!
//! The bucket refills lazily: each call recomputes the token level from the
//! time elapsed since the previous call instead of relying on a ticking timer.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{GateError, Result};

/// Slack for floating-point residue when comparing token counts, so that an
/// exact accrual such as 6 s at 10 tokens / 60 s counts as a whole token.
const TOKEN_EPSILON: f64 = 1e-9;

// == Token Bucket ==
/// Fractional token bucket, starting full.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_rate_per_sec: f64,
    last_refill: Instant,
}

/// Read-only view of a bucket after a refill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketStatus {
    /// Tokens currently available
    pub tokens: f64,
    /// Maximum tokens
    pub capacity: f64,
    /// Tokens regained per second
    pub refill_rate_per_sec: f64,
    /// Seconds until at least one whole token is available
    pub next_token_in_secs: f64,
}

impl TokenBucket {
    // == Constructor ==
    /// Creates a full bucket.
    ///
    /// # Errors
    /// `GateError::Config` when `capacity` or `refill_rate_per_sec` is not a
    /// positive finite number.
    pub fn new(capacity: f64, refill_rate_per_sec: f64, now: Instant) -> Result<Self> {
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(GateError::config(format!(
                "rate limit capacity must be positive, got {capacity}"
            )));
        }
        if !(refill_rate_per_sec.is_finite() && refill_rate_per_sec > 0.0) {
            return Err(GateError::config(format!(
                "rate limit refill rate must be positive, got {refill_rate_per_sec}"
            )));
        }

        Ok(Self {
            capacity,
            tokens: capacity,
            refill_rate_per_sec,
            last_refill: now,
        })
    }

    /// Creates a bucket admitting `requests` calls per `period`.
    ///
    /// The burst size equals `requests` and the bucket refills at
    /// `requests / period`.
    pub fn per_period(requests: u32, period: Duration, now: Instant) -> Result<Self> {
        if requests == 0 {
            return Err(GateError::config("rate limit requests per period must be at least 1"));
        }
        if period.is_zero() {
            return Err(GateError::config("rate limit period must be positive"));
        }
        let requests = f64::from(requests);
        Self::new(requests, requests / period.as_secs_f64(), now)
    }

    // == Refill ==
    /// Brings the token level up to date with `now`.
    ///
    /// A `now` earlier than the last refill adds nothing.
    pub fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate_per_sec).min(self.capacity);
        if now > self.last_refill {
            self.last_refill = now;
        }
    }

    // == Try Consume ==
    /// Refills, then spends `cost` tokens if they are available.
    ///
    /// On denial the refilled level is kept; nothing is spent.
    pub fn try_consume(&mut self, cost: f64, now: Instant) -> bool {
        self.refill(now);
        if self.has(cost) {
            self.spend(cost);
            true
        } else {
            false
        }
    }

    /// Whether `cost` tokens are on hand as of the last refill.
    pub fn has(&self, cost: f64) -> bool {
        self.tokens + TOKEN_EPSILON >= cost
    }

    /// Spends `cost` tokens without checking, never going below zero.
    ///
    /// Callers check `has` first; this lets several buckets be tested and
    /// then debited as one step.
    pub fn spend(&mut self, cost: f64) {
        self.tokens = (self.tokens - cost).max(0.0);
    }

    // == Time Until Next Token ==
    /// Refills, then reports how long until one whole token is available.
    pub fn time_until_next_token(&mut self, now: Instant) -> Duration {
        self.refill(now);
        self.wait_for_one()
    }

    // == Status ==
    /// Refills, then snapshots the bucket.
    pub fn status(&mut self, now: Instant) -> BucketStatus {
        self.refill(now);
        BucketStatus {
            tokens: self.tokens,
            capacity: self.capacity,
            refill_rate_per_sec: self.refill_rate_per_sec,
            next_token_in_secs: self.wait_for_one().as_secs_f64(),
        }
    }

    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn refill_rate_per_sec(&self) -> f64 {
        self.refill_rate_per_sec
    }

    fn wait_for_one(&self) -> Duration {
        if self.tokens + TOKEN_EPSILON >= 1.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64((1.0 - self.tokens) / self.refill_rate_per_sec)
                .unwrap_or(Duration::MAX)
        }
    }
}
