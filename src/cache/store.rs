//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.
//! The store is single-threaded and takes the current instant from its caller;
//! `Cache` wraps it with a lock and a clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{GateError, Result};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker, always holding exactly the keys of `entries`
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifetime of every entry
    ttl: Duration,
}

impl<K: Clone + Eq + Hash, V: Clone> CacheStore<K, V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and TTL.
    ///
    /// # Errors
    /// `GateError::Config` when `capacity` is zero or `ttl` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(GateError::config("cache capacity must be at least 1"));
        }
        if ttl.is_zero() {
            return Err(GateError::config("cache ttl must be positive"));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity,
            ttl,
        })
    }

    // == Put ==
    /// Stores a value under `key` at time `now`.
    ///
    /// An existing key gets the new value and a fresh TTL. A new key in a full
    /// cache first purges expired entries; only if the cache is still full is
    /// the least recently used entry evicted and returned.
    pub fn put(&mut self, key: K, value: V, now: Instant) -> Option<K> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.refresh(value, now);
            self.lru.touch(&key);
            return None;
        }

        if self.entries.len() >= self.capacity {
            self.evict_expired(now);
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                evicted = Some(oldest);
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, now));
        evicted
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired, marking it most recently
    /// used. Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &K, now: Instant) -> Option<V> {
        let ttl = self.ttl;
        match self.entries.get_mut(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) if !entry.is_expired(now, ttl) => {
                entry.touch(now);
                let value = entry.value.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                return Some(value);
            }
            // Lazy expiry: purge and report a miss
            Some(_) => {}
        }

        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.record_expirations(1);
        self.stats.record_miss();
        None
    }

    /// Looks up a key without touching recency or statistics.
    #[cfg(test)]
    pub(crate) fn peek(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .map(|entry| &entry.value)
    }

    // == Clear ==
    /// Drops every entry. Capacity and TTL are unchanged.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.record_clear();
        removed
    }

    // == Evict Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Live Length ==
    /// Number of entries still within their TTL at `now`.
    ///
    /// Expired entries that have not been purged yet are not counted.
    pub fn live_len(&self, now: Instant) -> usize {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .count()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self, now: Instant) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.current_size = self.live_len(now);
        stats.capacity = self.capacity;
        stats.ttl_secs = self.ttl.as_secs_f64();
        stats.hit_rate = stats.hit_rate();
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True when the recency order tracks exactly the stored keys.
    pub fn is_consistent(&self) -> bool {
        self.lru.len() == self.entries.len()
            && self.entries.keys().all(|key| self.lru.contains(key))
    }

    /// Stored keys from least to most recently used.
    pub fn keys_oldest_first(&self) -> Vec<K> {
        self.lru.keys_oldest_first().cloned().collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(5);

    fn secs(start: Instant, s: u64) -> Instant {
        start + Duration::from_secs(s)
    }

    fn store(capacity: usize) -> CacheStore<&'static str, String> {
        CacheStore::new(capacity, TTL).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.ttl(), TTL);
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let result = CacheStore::<u32, u32>::new(0, TTL);
        assert!(matches!(result, Err(GateError::Config(_))));
    }

    #[test]
    fn test_store_rejects_zero_ttl() {
        let result = CacheStore::<u32, u32>::new(10, Duration::ZERO);
        assert!(matches!(result, Err(GateError::Config(_))));
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("key1", "value1".to_string(), t0);

        assert_eq!(store.get(&"key1", t0), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.get(&"nonexistent", Instant::now()), None);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("key1", "value1".to_string(), t0);
        store.put("key1", "value2".to_string(), t0);

        assert_eq!(store.get(&"key1", t0), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("k", "v".to_string(), t0);

        assert_eq!(store.get(&"k", secs(t0, 4)), Some("v".to_string()));
        assert_eq!(store.get(&"k", secs(t0, 6)), None);
        assert_eq!(store.len(), 0);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("k", "v1".to_string(), t0);
        store.put("k", "v2".to_string(), secs(t0, 4));

        assert_eq!(store.get(&"k", secs(t0, 6)), Some("v2".to_string()));
    }

    #[test]
    fn test_store_reads_do_not_extend_ttl() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("k", "v".to_string(), t0);
        assert!(store.get(&"k", secs(t0, 4)).is_some());

        assert_eq!(store.get(&"k", secs(t0, 5)), None);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(3);
        let t0 = Instant::now();

        store.put("key1", "value1".to_string(), t0);
        store.put("key2", "value2".to_string(), t0);
        store.put("key3", "value3".to_string(), t0);

        // Cache is full, adding key4 should evict key1 (oldest)
        let evicted = store.put("key4", "value4".to_string(), t0);

        assert_eq!(evicted, Some("key1"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&"key1", t0), None);
        assert!(store.get(&"key2", t0).is_some());
        assert!(store.get(&"key3", t0).is_some());
        assert!(store.get(&"key4", t0).is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(2);
        let t0 = Instant::now();

        store.put("A", "a".to_string(), t0);
        store.put("B", "b".to_string(), t0);
        store.get(&"A", t0);
        store.put("C", "c".to_string(), t0);

        assert_eq!(store.get(&"B", t0), None);
        assert!(store.get(&"A", t0).is_some());
        assert!(store.get(&"C", t0).is_some());
    }

    #[test]
    fn test_store_full_of_expired_purges_before_evicting() {
        let mut store = store(2);
        let t0 = Instant::now();

        store.put("A", "a".to_string(), t0);
        store.put("B", "b".to_string(), secs(t0, 2));
        store.get(&"A", secs(t0, 3));

        // A is expired at t=5 but still stored, and it is the most recent
        let evicted = store.put("C", "c".to_string(), secs(t0, 5));

        assert_eq!(evicted, None);
        assert_eq!(store.get(&"B", secs(t0, 5)), Some("b".to_string()));
        assert_eq!(store.get(&"C", secs(t0, 5)), Some("c".to_string()));
        let stats = store.stats(secs(t0, 5));
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.current_size, 2);
    }

    #[test]
    fn test_store_reports_sub_second_ttl() {
        let store: CacheStore<&str, String> =
            CacheStore::new(4, Duration::from_millis(500)).unwrap();

        assert_eq!(store.stats(Instant::now()).ttl_secs, 0.5);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = store(2);
        let t0 = Instant::now();

        store.put("A", "a".to_string(), t0);
        store.put("B", "b".to_string(), t0);
        let evicted = store.put("A", "a2".to_string(), t0);

        assert_eq!(evicted, None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.keys_oldest_first(), vec!["B", "A"]);
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("key1", "value1".to_string(), t0);
        store.get(&"key1", t0); // hit
        store.get(&"nonexistent", t0); // miss

        let stats = store.stats(t0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.current_size, 1);
        assert_eq!(stats.capacity, 100);
        assert_eq!(stats.ttl_secs, 5.0);
    }

    #[test]
    fn test_store_stats_exclude_unpurged_expired() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("old", "v".to_string(), t0);
        store.put("new", "v".to_string(), secs(t0, 3));

        let stats = store.stats(secs(t0, 6));
        assert_eq!(stats.current_size, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_evict_expired() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.put("key1", "value1".to_string(), t0);
        store.put("key2", "value2".to_string(), secs(t0, 3));

        let removed = store.evict_expired(secs(t0, 6));

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&"key2", secs(t0, 6)).is_some());
        assert_eq!(store.stats(secs(t0, 6)).expirations, 1);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_clear() {
        let mut store = store(10);
        let t0 = Instant::now();

        store.put("a", "1".to_string(), t0);
        store.put("b", "2".to_string(), t0);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(store.is_consistent());
        assert_eq!(store.capacity(), 10);

        // Still usable after a clear
        store.put("c", "3".to_string(), t0);
        assert_eq!(store.get(&"c", t0), Some("3".to_string()));
    }

    #[test]
    fn test_store_peek_leaves_recency_alone() {
        let mut store = store(2);
        let t0 = Instant::now();

        store.put("A", "a".to_string(), t0);
        store.put("B", "b".to_string(), t0);
        assert_eq!(store.peek(&"A", t0), Some(&"a".to_string()));
        store.put("C", "c".to_string(), t0);

        assert_eq!(store.peek(&"A", t0), None);
        assert_eq!(store.stats(t0).hits, 0);
    }
}
