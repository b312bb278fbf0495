//! Rate Limiter Module
//!
//! Admission gate in front of the upstream generator. A short-period bucket
//! bounds bursts and an optional hourly bucket bounds sustained use. Both
//! buckets and the counters sit behind one lock, so refill, check and spend
//! happen as a single step and two racing callers can never both spend the
//! same headroom.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::SharedClock;
use crate::error::Result;
use crate::limiter::{BucketStatus, TokenBucket};

const HOUR: Duration = Duration::from_secs(3600);

// == Admission ==
/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    /// One token was spent; the call may proceed
    Allowed,
    /// No token available; retry after the given wait
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

// == Limiter Status ==
/// Snapshot of the limiter, refreshed to the current time.
///
/// `tokens`, `capacity` and `refill_rate_per_sec` describe the short-period
/// bucket. `next_token_in_secs` accounts for both buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimiterStatus {
    pub tokens: f64,
    pub capacity: f64,
    pub refill_rate_per_sec: f64,
    /// Seconds until a call would be admitted
    pub next_token_in_secs: f64,
    /// Hourly quota bucket, when one is configured
    pub hourly: Option<BucketStatus>,
    /// Calls admitted since start
    pub admitted: u64,
    /// Calls refused since start
    pub throttled: u64,
}

#[derive(Debug)]
struct LimiterState {
    bucket: TokenBucket,
    hourly: Option<TokenBucket>,
    admitted: u64,
    throttled: u64,
}

impl LimiterState {
    fn refill(&mut self, now: Instant) {
        self.bucket.refill(now);
        if let Some(hourly) = self.hourly.as_mut() {
            hourly.refill(now);
        }
    }

    /// Spends `cost` from every bucket, or from none of them.
    fn try_spend(&mut self, cost: f64, now: Instant) -> bool {
        self.refill(now);
        let available =
            self.bucket.has(cost) && self.hourly.as_ref().map_or(true, |h| h.has(cost));

        if available {
            self.bucket.spend(cost);
            if let Some(hourly) = self.hourly.as_mut() {
                hourly.spend(cost);
            }
            self.admitted += 1;
        } else {
            self.throttled += 1;
        }
        available
    }

    /// Longest wait across the buckets for one whole token.
    fn wait(&mut self, now: Instant) -> Duration {
        let short = self.bucket.time_until_next_token(now);
        match self.hourly.as_mut() {
            Some(hourly) => short.max(hourly.time_until_next_token(now)),
            None => short,
        }
    }
}

// == Rate Limiter ==
/// Thread-safe token-bucket rate limiter. Never sleeps or blocks on time.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<LimiterState>,
    clock: SharedClock,
}

impl RateLimiter {
    // == Constructors ==
    /// Creates a limiter with burst `capacity` refilling at `refill_rate_per_sec`.
    ///
    /// # Errors
    /// `GateError::Config` when either value is not positive.
    pub fn new(capacity: u32, refill_rate_per_sec: f64, clock: SharedClock) -> Result<Self> {
        let bucket = TokenBucket::new(f64::from(capacity), refill_rate_per_sec, clock.now())?;
        Ok(Self::with_bucket(bucket, clock))
    }

    /// Creates a limiter admitting `requests` calls per `period`.
    pub fn per_period(requests: u32, period: Duration, clock: SharedClock) -> Result<Self> {
        let bucket = TokenBucket::per_period(requests, period, clock.now())?;
        info!(
            requests,
            period_secs = period.as_secs_f64(),
            "Rate limiter initialized"
        );
        Ok(Self::with_bucket(bucket, clock))
    }

    /// Adds a quota of `requests` calls per hour on top of the existing bucket.
    ///
    /// A call is admitted only when both buckets have a token.
    ///
    /// # Errors
    /// `GateError::Config` when `requests` is zero.
    pub fn with_hourly_quota(mut self, requests: u32) -> Result<Self> {
        let hourly = TokenBucket::per_period(requests, HOUR, self.clock.now())?;
        info!(requests, "Hourly quota enabled");
        self.state.get_mut().hourly = Some(hourly);
        Ok(self)
    }

    fn with_bucket(bucket: TokenBucket, clock: SharedClock) -> Self {
        Self {
            state: Mutex::new(LimiterState {
                bucket,
                hourly: None,
                admitted: 0,
                throttled: 0,
            }),
            clock,
        }
    }

    // == Try Consume ==
    /// Spends `cost` tokens if available. A zero cost is always admitted.
    pub fn try_consume(&self, cost: u32) -> bool {
        let now = self.clock.now();
        self.state.lock().try_spend(f64::from(cost), now)
    }

    // == Check ==
    /// Tries to spend one token and, on denial, reports how long to wait.
    ///
    /// The decision and the hint come from the same locked refill.
    pub fn check(&self) -> Admission {
        let now = self.clock.now();
        let mut state = self.state.lock();
        if state.try_spend(1.0, now) {
            debug!(tokens_left = state.bucket.tokens(), "Upstream call admitted");
            Admission::Allowed
        } else {
            let retry_after = state.wait(now);
            debug!(retry_after_secs = retry_after.as_secs_f64(), "Upstream call throttled");
            Admission::Denied { retry_after }
        }
    }

    // == Time Until Next Token ==
    pub fn time_until_next_token(&self) -> Duration {
        let now = self.clock.now();
        self.state.lock().wait(now)
    }

    // == Status ==
    /// Current token levels, configuration and counters.
    pub fn status(&self) -> LimiterStatus {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let bucket = state.bucket.status(now);
        let hourly = state.hourly.as_mut().map(|h| h.status(now));
        let next_token_in_secs = state.wait(now).as_secs_f64();
        LimiterStatus {
            tokens: bucket.tokens,
            capacity: bucket.capacity,
            refill_rate_per_sec: bucket.refill_rate_per_sec,
            next_token_in_secs,
            hourly,
            admitted: state.admitted,
            throttled: state.throttled,
        }
    }
}
