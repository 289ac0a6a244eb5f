// SPDX-License-Identifier: GPL-3.0-only

//! Daemon configuration
//!
//! The block list is compiled in; only logging reads the environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use diskblock_types::{BlockList, VolumeId};
use uuid::uuid;

/// The volume diskblock keeps from mounting.
pub const BLOCKED_VOLUME: VolumeId =
    VolumeId::from_uuid(uuid!("49D00007-FF63-36B9-9D69-6B3BE16866BB"));

pub const MEMORY_REPORT_INTERVAL: Duration = Duration::from_secs(60);

const DEFAULT_LOG_FILE: &str = "diskblock.log";

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub block_list: Arc<BlockList>,
    pub memory_report_interval: Duration,
    pub logging: LogSettings,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self {
            block_list: Arc::new(BlockList::single(BLOCKED_VOLUME)),
            memory_report_interval: MEMORY_REPORT_INTERVAL,
            logging: LogSettings::from_env(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Log file path, or `None` for stdout only.
    pub file: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::resolve(|name| std::env::var(name).ok(), exe_dir.as_deref())
    }

    /// Resolve the log file from `DISKBLOCK_DISABLE_FILE_LOG` and
    /// `DISKBLOCK_LOG_FILEPATH`, defaulting to a file next to the executable.
    pub fn resolve(env: impl Fn(&str) -> Option<String>, exe_dir: Option<&Path>) -> Self {
        if let Some(value) = env("DISKBLOCK_DISABLE_FILE_LOG")
            && matches!(value.to_lowercase().as_str(), "1" | "true")
        {
            return Self { file: None };
        }

        if let Some(value) = env("DISKBLOCK_LOG_FILEPATH") {
            let file = (!value.is_empty()).then(|| PathBuf::from(value));
            return Self { file };
        }

        Self {
            file: exe_dir.map(|dir| dir.join(DEFAULT_LOG_FILE)),
        }
    }
}
