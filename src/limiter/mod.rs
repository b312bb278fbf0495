//! Rate Limiter Module
//!
//! Token-bucket admission control for upstream calls.

mod bucket;
mod rate_limiter;

pub use bucket::{BucketStatus, TokenBucket};
pub use rate_limiter::{Admission, LimiterStatus, RateLimiter};
