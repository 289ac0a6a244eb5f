// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use diskblock_contracts::{EventLoop, MemorySampler};
use diskblock_types::memory_to_pretty;

/// Periodically logs the daemon's resident memory. Read-only and independent
/// of the mount decisions.
pub struct MemoryMonitor<S> {
    sampler: S,
}

impl<S: MemorySampler> MemoryMonitor<S> {
    pub fn new(sampler: S) -> Self {
        Self { sampler }
    }

    /// Human-readable resident memory, or "UNKNOWN" when it cannot be read.
    pub fn current_usage(&self) -> String {
        self.sampler
            .resident_bytes()
            .map(memory_to_pretty)
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    pub fn report(&self) {
        // Sampled outside the macro: tracing skips disabled events' arguments.
        let usage = self.current_usage();
        tracing::info!("memory usage: {usage}");
    }
}

impl<S: MemorySampler + 'static> MemoryMonitor<S> {
    /// Report once now, then every `interval` on `event_loop`.
    pub fn install<L: EventLoop + ?Sized>(self, event_loop: &mut L, interval: Duration) {
        self.report();
        event_loop.add_periodic(interval, Box::new(move || self.report()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskblock_testing::{FixedMemorySampler, ManualEventLoop};

    #[test]
    fn formats_known_usage() {
        let monitor = MemoryMonitor::new(FixedMemorySampler::new(Some(13_107_200)));
        assert_eq!(monitor.current_usage(), "12.50 MB (13,107,200 bytes)");
    }

    #[test]
    fn unknown_usage_is_reported_as_such() {
        let monitor = MemoryMonitor::new(FixedMemorySampler::new(None));
        assert_eq!(monitor.current_usage(), "UNKNOWN");
    }

    #[test]
    fn install_samples_now_and_on_every_tick() {
        let sampler = FixedMemorySampler::new(Some(1024));
        let mut event_loop = ManualEventLoop::default();

        MemoryMonitor::new(sampler.clone()).install(&mut event_loop, Duration::from_secs(60));
        assert_eq!(sampler.samples(), 1);
        assert_eq!(event_loop.intervals(), vec![Duration::from_secs(60)]);

        event_loop.tick();
        event_loop.tick();
        assert_eq!(sampler.samples(), 3);
    }
}
