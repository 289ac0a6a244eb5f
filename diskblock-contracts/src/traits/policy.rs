// SPDX-License-Identifier: GPL-3.0-only

use diskblock_types::Decision;

use super::DiskHandle;

/// Decides whether a volume may mount.
///
/// The OS invokes this on a thread it chooses, possibly for several disks at
/// once, so implementations must be `Send + Sync` and must not block or touch
/// the session that dispatched them.
pub trait MountPolicy: Send + Sync {
    fn decide(&self, disk: &dyn DiskHandle) -> Decision;
}
