// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

pub type PeriodicTask = Box<dyn FnMut() + 'static>;

/// The process main loop that delivers both timers and arbitration events.
pub trait EventLoop {
    /// Run `task` every `interval` once the loop is running.
    fn add_periodic(&mut self, interval: Duration, task: PeriodicTask);

    /// Park the calling thread in the loop. Returns only if the loop is stopped.
    fn run(&mut self);
}

/// Reads the resident memory of the current process.
pub trait MemorySampler {
    fn resident_bytes(&self) -> Option<u64>;
}
