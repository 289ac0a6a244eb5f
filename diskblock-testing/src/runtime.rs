// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use diskblock_contracts::{EventLoop, MemorySampler, PeriodicTask};

/// Event loop that never blocks: `run` returns immediately and periodic tasks
/// only fire on [`ManualEventLoop::tick`].
#[derive(Default)]
pub struct ManualEventLoop {
    tasks: Vec<(Duration, PeriodicTask)>,
    runs: usize,
}

impl ManualEventLoop {
    /// Fire every periodic task once.
    pub fn tick(&mut self) {
        for (_, task) in &mut self.tasks {
            task();
        }
    }

    pub fn intervals(&self) -> Vec<Duration> {
        self.tasks.iter().map(|(interval, _)| *interval).collect()
    }

    pub fn runs(&self) -> usize {
        self.runs
    }
}

impl EventLoop for ManualEventLoop {
    fn add_periodic(&mut self, interval: Duration, task: PeriodicTask) {
        self.tasks.push((interval, task));
    }

    fn run(&mut self) {
        self.runs += 1;
    }
}

/// Sampler returning a fixed value and counting how often it was read.
#[derive(Debug, Clone, Default)]
pub struct FixedMemorySampler {
    bytes: Option<u64>,
    samples: Arc<AtomicUsize>,
}

impl FixedMemorySampler {
    pub fn new(bytes: Option<u64>) -> Self {
        Self {
            bytes,
            samples: Arc::default(),
        }
    }

    pub fn samples(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

impl MemorySampler for FixedMemorySampler {
    fn resident_bytes(&self) -> Option<u64> {
        self.samples.fetch_add(1, Ordering::SeqCst);
        self.bytes
    }
}
