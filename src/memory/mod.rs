//! Memory Module
//!
//! Memory-pressure policy for the response cache and the process sampler
//! that feeds it.

mod guard;
mod sampler;

pub use guard::{MemoryAction, MemoryGuard, MemoryStatus, Shed};
pub use sampler::{MemorySampler, ProcessSampler};
