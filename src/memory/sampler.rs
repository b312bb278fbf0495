//! Process Memory Sampler
//!
//! Reads the resident set size of the current process.

use parking_lot::Mutex;
use sysinfo::{Pid, System};

// == Memory Sampler Trait ==
/// Source of memory readings for the guard.
pub trait MemorySampler: Send + Sync {
    /// Current usage in bytes, or `None` when unavailable.
    fn sample(&self) -> Option<u64>;
}

// == Process Sampler ==
/// Samples the RSS of this process through `sysinfo`.
pub struct ProcessSampler {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl ProcessSampler {
    pub fn new() -> Self {
        Self {
            pid: sysinfo::get_current_pid().ok(),
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for ProcessSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySampler for ProcessSampler {
    fn sample(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut system = self.system.lock();
        if !system.refresh_process(pid) {
            return None;
        }
        system.process(pid).map(|process| process.memory())
    }
}
