//! Memory Guard Module
//!
//! Compares memory readings against a threshold and empties the cache when the
//! threshold is reached. The response is all-or-nothing: one reading at or
//! above the threshold clears the whole cache. There is no cool-down, so a
//! process that stays above the threshold gets its cache cleared on every
//! check.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::error::{GateError, Result};
use crate::memory::MemorySampler;

// == Shed Trait ==
/// Something that can drop its contents to free memory.
pub trait Shed: Send + Sync {
    /// Releases everything it holds and returns how many items went.
    fn shed(&self) -> usize;
}

impl<K, V> Shed for Cache<K, V>
where
    K: Clone + Eq + Hash + Send,
    V: Clone + Send,
{
    fn shed(&self) -> usize {
        self.clear()
    }
}

// == Memory Action ==
/// What a check decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryAction {
    /// Usage below threshold
    None,
    /// Usage at or above threshold; the cache was cleared
    Clear,
}

// == Memory Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryStatus {
    /// Most recent reading
    pub last_usage_bytes: u64,
    /// Highest reading seen since start
    pub peak_bytes: u64,
    pub threshold_bytes: u64,
    /// Readings evaluated
    pub checks: u64,
    /// Readings that triggered a clear
    pub clears: u64,
    /// Whether the last reading was at or above the threshold
    pub under_pressure: bool,
}

// == Memory Guard ==
/// Threshold policy over memory readings.
///
/// Holds only a weak reference to the cache it protects; the cache is owned
/// elsewhere.
pub struct MemoryGuard {
    threshold_bytes: u64,
    target: Weak<dyn Shed>,
    last_usage: AtomicU64,
    peak: AtomicU64,
    checks: AtomicU64,
    clears: AtomicU64,
}

impl std::fmt::Debug for MemoryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGuard")
            .field("threshold_bytes", &self.threshold_bytes)
            .field("peak_bytes", &self.peak_usage())
            .finish()
    }
}

impl MemoryGuard {
    // == Constructor ==
    /// Creates a guard that clears `target` once usage reaches `threshold_bytes`.
    ///
    /// # Errors
    /// `GateError::Config` when the threshold is zero.
    pub fn new<T: Shed + 'static>(threshold_bytes: u64, target: &Arc<T>) -> Result<Self> {
        if threshold_bytes == 0 {
            return Err(GateError::config("memory threshold must be positive"));
        }
        let target: Arc<dyn Shed> = target.clone();

        Ok(Self {
            threshold_bytes,
            target: Arc::downgrade(&target),
            last_usage: AtomicU64::new(0),
            peak: AtomicU64::new(0),
            checks: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        })
    }

    /// Creates a guard with the threshold given in mebibytes.
    pub fn with_threshold_mb<T: Shed + 'static>(threshold_mb: u64, target: &Arc<T>) -> Result<Self> {
        Self::new(threshold_mb.saturating_mul(1024 * 1024), target)
    }

    // == Check ==
    /// Evaluates one reading.
    ///
    /// Below the threshold nothing is touched. At or above it, the cache is
    /// cleared exactly once for this call.
    pub fn check(&self, usage_bytes: u64) -> MemoryAction {
        self.checks.fetch_add(1, Ordering::Relaxed);
        self.last_usage.store(usage_bytes, Ordering::Relaxed);
        self.peak.fetch_max(usage_bytes, Ordering::Relaxed);

        if usage_bytes < self.threshold_bytes {
            debug!(usage_bytes, threshold_bytes = self.threshold_bytes, "Memory within threshold");
            return MemoryAction::None;
        }

        self.clears.fetch_add(1, Ordering::Relaxed);
        let entries_removed = self.target.upgrade().map(|target| target.shed());
        warn!(
            usage_mb = to_mb(usage_bytes),
            threshold_mb = to_mb(self.threshold_bytes),
            entries_removed = entries_removed.unwrap_or(0),
            "Memory threshold reached, cache cleared"
        );
        MemoryAction::Clear
    }

    /// Samples the process and evaluates the reading.
    ///
    /// Returns `None` when the sampler cannot report memory on this platform.
    pub fn check_process(&self, sampler: &dyn MemorySampler) -> Option<MemoryAction> {
        sampler.sample().map(|usage| self.check(usage))
    }

    // == Peak Usage ==
    /// Highest reading seen since the guard was created.
    pub fn peak_usage(&self) -> u64 {
        self.peak.load(Ordering::Relaxed)
    }

    pub fn threshold_bytes(&self) -> u64 {
        self.threshold_bytes
    }

    pub fn status(&self) -> MemoryStatus {
        let last_usage_bytes = self.last_usage.load(Ordering::Relaxed);
        let checks = self.checks.load(Ordering::Relaxed);
        MemoryStatus {
            last_usage_bytes,
            peak_bytes: self.peak_usage(),
            threshold_bytes: self.threshold_bytes,
            checks,
            clears: self.clears.load(Ordering::Relaxed),
            under_pressure: checks > 0 && last_usage_bytes >= self.threshold_bytes,
        }
    }
}

fn to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
