//! Memory Watch Task
//!
//! Samples process memory on a fixed interval and hands each reading to the
//! memory guard.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::memory::{MemoryAction, MemoryGuard, MemorySampler};

/// Spawns a background task that checks memory every `interval`.
///
/// A sampler that cannot read memory on this platform makes every tick a
/// no-op.
pub fn spawn_memory_watch(
    guard: Arc<MemoryGuard>,
    sampler: Arc<dyn MemorySampler>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs_f64(),
            threshold_bytes = guard.threshold_bytes(),
            "Starting memory watch task"
        );

        loop {
            tokio::time::sleep(interval).await;

            match guard.check_process(sampler.as_ref()) {
                Some(MemoryAction::Clear) => {}
                Some(MemoryAction::None) => debug!("Memory watch: within threshold"),
                None => debug!("Memory watch: usage unavailable"),
            }
        }
    })
}
