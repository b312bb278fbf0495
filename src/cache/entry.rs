//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion time, the anchor for TTL expiry
    pub created_at: Instant,
    /// Time of the last successful read or write
    pub last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            last_accessed: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once its age is greater than
    /// or equal to the TTL, so a live entry always satisfies `age < ttl`.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }

    // == Age ==
    /// Time since insertion. Saturates to zero if `now` precedes `created_at`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Time To Live ==
    /// Returns remaining lifetime, or zero when already expired.
    pub fn ttl_remaining(&self, now: Instant, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age(now))
    }

    /// Replaces the value and restarts the TTL.
    pub fn refresh(&mut self, value: V, now: Instant) {
        self.value = value;
        self.created_at = now;
        self.last_accessed = now;
    }

    /// Records a read at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
    }
}
