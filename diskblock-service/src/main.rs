// SPDX-License-Identifier: GPL-3.0-only

//! diskblock - keeps a blocked volume from mounting
//!
//! Registers with the OS disk arbitration service, unmounts the blocked volume
//! if it is already mounted, then vetoes every later attempt to mount it.

use anyhow::Result;

mod config;
mod logging;
mod platform;

use config::DaemonConfig;

fn main() -> Result<()> {
    let config = DaemonConfig::from_env();
    let _log_guard = logging::init(&config.logging);

    tracing::info!("Starting diskblock v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Blocked volumes: {}", config.block_list);
    if let Some(file) = &config.logging.file {
        tracing::info!("Logging to {}", file.display());
    }

    platform::run(&config)
}
