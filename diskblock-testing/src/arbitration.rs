// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use diskblock_contracts::{
    ArbitrationBackend, ArbitrationError, ArbitrationSession, DiskHandle, MountPolicy, Result,
};
use diskblock_types::{Decision, DiskDescription, VolumeId};

/// Session interaction recorded by [`FakeArbitration`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SessionCreated,
    UnmountRequested(PathBuf),
    ApprovalRegistered,
    Scheduled,
}

#[derive(Debug, Clone)]
struct FakeVolume {
    path: PathBuf,
    /// `None` means the OS cannot turn the path into a disk at all.
    disk: Option<FakeDisk>,
}

#[derive(Default)]
struct FakeState {
    mounted: Vec<FakeVolume>,
    enumeration_fails: bool,
    refuse_sessions: bool,
    sessions_created: usize,
    journal: Vec<SessionEvent>,
    policy: Option<Arc<dyn MountPolicy>>,
}

/// Scriptable disk arbitration service. Clones share state, so a test can
/// keep one handle while the code under test owns another.
#[derive(Clone, Default)]
pub struct FakeArbitration {
    state: Arc<Mutex<FakeState>>,
}

impl FakeArbitration {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mounted volume whose description carries `id` (or no UUID at all).
    pub fn with_mounted(self, path: impl Into<PathBuf>, id: Option<VolumeId>) -> Self {
        let path = path.into();
        let disk = FakeDisk::mounted_at(&path, id);
        self.with_disk(path, Some(disk))
    }

    /// A mounted volume the OS cannot resolve to a disk.
    pub fn with_unresolvable(self, path: impl Into<PathBuf>) -> Self {
        self.with_disk(path.into(), None)
    }

    pub fn failing_enumeration(self) -> Self {
        self.lock().enumeration_fails = true;
        self
    }

    pub fn refusing_sessions(self) -> Self {
        self.lock().refuse_sessions = true;
        self
    }

    /// Mount another volume after start-up.
    pub fn mount(&self, path: impl Into<PathBuf>, id: Option<VolumeId>) {
        let path = path.into();
        let disk = FakeDisk::mounted_at(&path, id);
        self.lock().mounted.push(FakeVolume {
            path,
            disk: Some(disk),
        });
    }

    /// Dispatch a mount attempt the way the OS would. `None` when no policy
    /// has been registered.
    pub fn attempt_mount(&self, disk: &FakeDisk) -> Option<Decision> {
        // Released before dispatch so a policy touching the session cannot deadlock.
        let policy = self.lock().policy.clone()?;
        Some(policy.decide(disk))
    }

    pub fn journal(&self) -> Vec<SessionEvent> {
        self.lock().journal.clone()
    }

    pub fn unmount_requests(&self) -> Vec<PathBuf> {
        self.lock()
            .journal
            .iter()
            .filter_map(|event| match event {
                SessionEvent::UnmountRequested(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn mounted_paths(&self) -> Vec<PathBuf> {
        self.lock()
            .mounted
            .iter()
            .map(|volume| volume.path.clone())
            .collect()
    }

    pub fn sessions_created(&self) -> usize {
        self.lock().sessions_created
    }

    fn with_disk(self, path: PathBuf, disk: Option<FakeDisk>) -> Self {
        self.lock().mounted.push(FakeVolume { path, disk });
        self
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArbitrationBackend for FakeArbitration {
    type Session = FakeSession;

    fn create_session(&self) -> Result<FakeSession> {
        let mut state = self.lock();
        if state.refuse_sessions {
            return Err(ArbitrationError::SessionUnavailable(
                "session creation refused".to_string(),
            ));
        }

        state.sessions_created += 1;
        state.journal.push(SessionEvent::SessionCreated);
        Ok(FakeSession {
            state: self.state.clone(),
        })
    }
}

pub struct FakeSession {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSession {
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArbitrationSession for FakeSession {
    type Disk = FakeDisk;

    fn mounted_volumes(&self) -> Option<Vec<PathBuf>> {
        let state = self.lock();
        if state.enumeration_fails {
            return None;
        }
        Some(state.mounted.iter().map(|v| v.path.clone()).collect())
    }

    fn disk_for_volume(&self, volume: &Path) -> Option<FakeDisk> {
        self.lock()
            .mounted
            .iter()
            .find(|v| v.path == volume)
            .and_then(|v| v.disk.clone())
    }

    fn request_unmount(&self, disk: &FakeDisk) {
        let Some(path) = disk.volume_path() else {
            return;
        };

        let mut state = self.lock();
        state.mounted.retain(|v| v.path != path);
        state.journal.push(SessionEvent::UnmountRequested(path));
    }

    fn register_approval(&mut self, policy: Arc<dyn MountPolicy>) {
        let mut state = self.lock();
        state.policy = Some(policy);
        state.journal.push(SessionEvent::ApprovalRegistered);
    }

    fn schedule(&mut self) {
        self.lock().journal.push(SessionEvent::Scheduled);
    }
}

/// Disk handle backed by a fixed description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeDisk {
    description: Option<DiskDescription>,
}

impl FakeDisk {
    pub fn new(description: Option<DiskDescription>) -> Self {
        Self { description }
    }

    pub fn with_id(id: VolumeId) -> Self {
        Self::new(Some(DiskDescription::with_volume_id(id)))
    }

    pub fn mounted_at(path: &Path, id: Option<VolumeId>) -> Self {
        Self::new(Some(DiskDescription {
            volume_path: Some(path.to_path_buf()),
            volume_id: id,
            ..DiskDescription::default()
        }))
    }

    /// A disk whose description query fails outright.
    pub fn undescribed() -> Self {
        Self::new(None)
    }

    fn volume_path(&self) -> Option<PathBuf> {
        self.description.as_ref()?.volume_path.clone()
    }
}

impl DiskHandle for FakeDisk {
    fn description(&self) -> Option<DiskDescription> {
        self.description.clone()
    }
}
