//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction, plus the
//! request fingerprint used as the cache key.

mod entry;
mod fingerprint;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fingerprint::{fingerprint, fingerprint_params, Fingerprint, Params};
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
