// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::sync::Arc;

use diskblock_types::DiskDescription;

use super::MountPolicy;
use crate::Result;

/// Opaque reference to a disk, only valid for the callback or enumeration
/// step that produced it.
pub trait DiskHandle {
    /// Copy the OS description of this disk. `None` when the OS has none,
    /// e.g. for media that is being ejected.
    fn description(&self) -> Option<DiskDescription>;
}

/// Entry point into the OS disk arbitration service.
pub trait ArbitrationBackend {
    type Session: ArbitrationSession;

    fn create_session(&self) -> Result<Self::Session>;
}

/// This process's registration with the disk arbitration service.
pub trait ArbitrationSession {
    type Disk: DiskHandle;

    /// Paths of every mounted volume, or `None` if the OS could not list them.
    fn mounted_volumes(&self) -> Option<Vec<PathBuf>>;

    /// Resolve a mounted volume path to a disk scoped to this session.
    fn disk_for_volume(&self, volume: &Path) -> Option<Self::Disk>;

    /// Ask the OS to unmount `disk` with default options. The outcome arrives
    /// asynchronously and is only logged.
    fn request_unmount(&self, disk: &Self::Disk);

    /// Route every mount approval request to `policy` until the session is
    /// dropped.
    fn register_approval(&mut self, policy: Arc<dyn MountPolicy>);

    /// Deliver session events on the calling thread's event loop.
    fn schedule(&mut self);
}
