// SPDX-License-Identifier: GPL-3.0-only

use anyhow::Result;

use crate::config::DaemonConfig;

#[cfg(target_os = "macos")]
pub(crate) fn run(config: &DaemonConfig) -> Result<()> {
    use anyhow::Context;
    use diskblock_core::{MemoryMonitor, SessionController};
    use diskblock_sys::{DaBackend, MachMemorySampler, PowerSubscription, RunLoop};

    let mut event_loop = RunLoop::current();

    MemoryMonitor::new(MachMemorySampler).install(&mut event_loop, config.memory_report_interval);

    // Held until the run loop exits.
    let power = PowerSubscription::subscribe(|event| tracing::info!("power event: {event:?}"));
    if power.is_none() {
        tracing::warn!("Power notifications unavailable");
    }

    let mut controller = SessionController::new(DaBackend, config.block_list.clone());
    controller
        .start()
        .context("Disk arbitration is unavailable")?;

    tracing::info!("Service ready, waiting for mount requests...");
    controller.run(&mut event_loop)?;

    tracing::info!("diskblock shutting down");
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub(crate) fn run(_config: &DaemonConfig) -> Result<()> {
    tracing::error!("diskblock requires macOS DiskArbitration");
    anyhow::bail!("unsupported platform: {}", std::env::consts::OS)
}
