//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at configured intervals
//! - Memory Watch: Feeds process memory readings to the memory guard

mod cleanup;
mod memory_watch;

pub use cleanup::spawn_cleanup_task;
pub use memory_watch::spawn_memory_watch;
