// SPDX-License-Identifier: GPL-3.0-only

//! Start-up sweep of volumes that were mounted before the daemon

use std::fmt;

use diskblock_contracts::ArbitrationSession;
use diskblock_types::{BlockList, VolumeId};

use crate::{inspect, is_blocked};

/// Summary of one sweep, for the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Mounted volumes the OS listed
    pub scanned: usize,
    /// Volumes skipped because no disk or identifier could be resolved
    pub unresolved: usize,
    /// Blocked volumes an unmount was requested for
    pub unmount_requested: Vec<VolumeId>,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned, {} unresolved, {} unmount requested",
            self.scanned,
            self.unresolved,
            self.unmount_requested.len()
        )
    }
}

/// Unmount every already-mounted volume on the block list.
///
/// Must run before the approval callback is registered. Never fails: a volume
/// listing failure ends the sweep early, unresolvable volumes are skipped,
/// and unmount outcomes are left to the session to log.
pub fn sweep<S: ArbitrationSession + ?Sized>(session: &S, block_list: &BlockList) -> SweepReport {
    tracing::info!("sweeping already mounted disks");

    let mut report = SweepReport::default();

    let Some(volumes) = session.mounted_volumes() else {
        tracing::error!("unable to get mounted volumes, skipping sweep");
        return report;
    };

    if volumes.is_empty() {
        tracing::warn!("no mounted volumes reported");
    }

    for volume in volumes {
        report.scanned += 1;
        tracing::debug!("disk: {}", volume.display());

        let Some(disk) = session.disk_for_volume(&volume) else {
            tracing::debug!("  - no disk for {}", volume.display());
            report.unresolved += 1;
            continue;
        };

        let inspection = inspect(&disk);
        let Some(id) = inspection.id() else {
            tracing::debug!("  - could not get uuid");
            report.unresolved += 1;
            continue;
        };

        tracing::debug!("  - uuid: {id}");
        if !is_blocked(&id, block_list) {
            continue;
        }

        tracing::warn!(
            "found blocked volume {} at {}, requesting unmount",
            id,
            volume.display()
        );
        session.request_unmount(&disk);
        report.unmount_requested.push(id);
    }

    tracing::info!("finished sweeping mounted disks: {report}");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskblock_contracts::ArbitrationBackend;
    use diskblock_testing::{FakeArbitration, volume_id};
    use std::path::PathBuf;

    fn session_for(backend: &FakeArbitration) -> diskblock_testing::FakeSession {
        backend.create_session().expect("fake session")
    }

    #[test]
    fn unmounts_only_the_blocked_volume() {
        let backend = FakeArbitration::new()
            .with_mounted("/Volumes/MONITOR", Some(volume_id(1)))
            .with_mounted("/Volumes/Backup", Some(volume_id(2)));
        let session = session_for(&backend);

        let report = sweep(&session, &BlockList::single(volume_id(1)));

        assert_eq!(report.scanned, 2);
        assert_eq!(report.unmount_requested, vec![volume_id(1)]);
        assert_eq!(
            backend.unmount_requests(),
            vec![PathBuf::from("/Volumes/MONITOR")]
        );
    }

    #[test]
    fn second_sweep_requests_nothing_new() {
        let backend = FakeArbitration::new()
            .with_mounted("/Volumes/MONITOR", Some(volume_id(1)))
            .with_mounted("/", Some(volume_id(9)));
        let session = session_for(&backend);
        let block_list = BlockList::single(volume_id(1));

        sweep(&session, &block_list);
        let second = sweep(&session, &block_list);

        assert!(second.unmount_requested.is_empty());
        assert_eq!(backend.unmount_requests().len(), 1);
    }

    #[test]
    fn enumeration_failure_is_soft() {
        let backend = FakeArbitration::new()
            .with_mounted("/Volumes/MONITOR", Some(volume_id(1)))
            .failing_enumeration();
        let session = session_for(&backend);

        let report = sweep(&session, &BlockList::single(volume_id(1)));

        assert_eq!(report, SweepReport::default());
        assert!(backend.unmount_requests().is_empty());
    }

    #[test]
    fn unresolvable_volumes_are_skipped() {
        let backend = FakeArbitration::new()
            .with_unresolvable("/dev")
            .with_mounted("/Volumes/Blank", None)
            .with_mounted("/Volumes/MONITOR", Some(volume_id(1)));
        let session = session_for(&backend);

        let report = sweep(&session, &BlockList::single(volume_id(1)));

        assert_eq!(report.scanned, 3);
        assert_eq!(report.unresolved, 2);
        assert_eq!(report.unmount_requested, vec![volume_id(1)]);
    }

    #[test]
    fn every_blocked_volume_is_unmounted() {
        let backend = FakeArbitration::new()
            .with_mounted("/Volumes/A", Some(volume_id(1)))
            .with_mounted("/Volumes/B", Some(volume_id(2)))
            .with_mounted("/Volumes/C", Some(volume_id(3)));
        let session = session_for(&backend);

        let report = sweep(&session, &BlockList::new([volume_id(1), volume_id(3)]));

        assert_eq!(report.unmount_requested, vec![volume_id(1), volume_id(3)]);
        assert_eq!(backend.mounted_paths(), vec![PathBuf::from("/Volumes/B")]);
    }
}
