//! Shared Cache Module
//!
//! Thread-safe front for `CacheStore`: one lock around the whole store and an
//! injected clock for TTL decisions. Every operation holds the lock for its
//! full duration, so no caller ever sees a half-updated recency order.

use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore};
use crate::clock::SharedClock;
use crate::error::Result;

// == Cache ==
/// Bounded LRU cache with TTL, safe to share across threads and tasks.
#[derive(Debug)]
pub struct Cache<K, V> {
    store: Mutex<CacheStore<K, V>>,
    clock: SharedClock,
}

impl<K: Clone + Eq + Hash, V: Clone> Cache<K, V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries for `ttl` each.
    ///
    /// # Errors
    /// `GateError::Config` when `capacity` or `ttl` is zero.
    pub fn new(capacity: usize, ttl: Duration, clock: SharedClock) -> Result<Self> {
        let store = CacheStore::new(capacity, ttl)?;
        info!(capacity, ttl_secs = ttl.as_secs_f64(), "Response cache initialized");
        Ok(Self {
            store: Mutex::new(store),
            clock,
        })
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` on a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        self.store.lock().get(key, now)
    }

    // == Put ==
    /// Stores `value` under `key`, evicting the LRU entry if full.
    pub fn put(&self, key: K, value: V) {
        let now = self.clock.now();
        let evicted = self.store.lock().put(key, value, now);
        if evicted.is_some() {
            debug!("Cache at capacity, evicted least recently used entry");
        }
    }

    // == Clear ==
    /// Drops every entry and returns how many were removed.
    pub fn clear(&self) -> usize {
        let removed = self.store.lock().clear();
        info!(entries_removed = removed, "Cache cleared");
        removed
    }

    // == Evict Expired ==
    /// Sweeps out every entry whose TTL has lapsed.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let removed = self.store.lock().evict_expired(now);
        if removed > 0 {
            debug!(entries_removed = removed, "Expired entries cleaned up");
        }
        removed
    }

    // == Size Hint ==
    /// Returns `(live entries, capacity)`.
    ///
    /// Expired entries still awaiting a purge are not counted.
    pub fn size_hint(&self) -> (usize, usize) {
        let now = self.clock.now();
        let store = self.store.lock();
        (store.live_len(now), store.capacity())
    }

    // == Stats Snapshot ==
    /// Returns hit/miss counters together with size and configuration.
    pub fn stats_snapshot(&self) -> CacheStats {
        let now = self.clock.now();
        self.store.lock().stats(now)
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    pub fn ttl(&self) -> Duration {
        self.store.lock().ttl()
    }
}
