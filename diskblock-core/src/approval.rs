// SPDX-License-Identifier: GPL-3.0-only

//! The mount-approval decision

use std::sync::Arc;

use diskblock_contracts::{DiskHandle, MountPolicy};
use diskblock_types::{BlockList, Decision};

use crate::{inspect, is_blocked};

/// Reason handed to the OS when a mount is vetoed.
pub const DENY_REASON: &str = "blocked by diskblock";

/// Denies exactly the volumes on the block list.
///
/// Fail-open: a disk whose identifier cannot be read is allowed, since it
/// cannot be classified. Only a positive identifier match is denied.
#[derive(Debug, Clone)]
pub struct BlockListPolicy {
    block_list: Arc<BlockList>,
}

impl BlockListPolicy {
    pub fn new(block_list: Arc<BlockList>) -> Self {
        Self { block_list }
    }
}

impl MountPolicy for BlockListPolicy {
    fn decide(&self, disk: &dyn DiskHandle) -> Decision {
        let inspection = inspect(disk);

        let Some(id) = inspection.id() else {
            match inspection.description() {
                Some(description) => {
                    tracing::info!("could not get UUID of mounting disk {description}, allowing")
                }
                None => tracing::info!("could not describe mounting disk, allowing"),
            }
            return Decision::Allow;
        };

        if !is_blocked(&id, &self.block_list) {
            tracing::info!("mounting disk {id} is not blocked");
            return Decision::Allow;
        }

        tracing::warn!("disk {id} attempting to mount, blocking");
        Decision::deny(DENY_REASON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskblock_testing::{FakeDisk, volume_id};
    use diskblock_types::DiskDescription;

    fn policy(list: BlockList) -> BlockListPolicy {
        BlockListPolicy::new(Arc::new(list))
    }

    #[test]
    fn blocked_volume_is_denied() {
        let policy = policy(BlockList::single(volume_id(1)));

        let decision = policy.decide(&FakeDisk::with_id(volume_id(1)));

        assert_eq!(decision, Decision::deny("blocked by diskblock"));
    }

    #[test]
    fn other_volume_is_allowed() {
        let policy = policy(BlockList::single(volume_id(1)));

        let decision = policy.decide(&FakeDisk::with_id(volume_id(2)));

        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn failed_metadata_query_is_allowed() {
        let policy = policy(BlockList::single(volume_id(1)));

        let decision = policy.decide(&FakeDisk::undescribed());

        assert!(decision.is_allowed());
    }

    #[test]
    fn unidentified_volume_is_allowed_whatever_the_list() {
        let lists = [
            BlockList::default(),
            BlockList::single(volume_id(1)),
            BlockList::new((0..=255).map(volume_id)),
        ];
        let unnamed = FakeDisk::new(Some(DiskDescription::default()));

        for list in lists {
            let policy = policy(list);
            assert!(policy.decide(&unnamed).is_allowed());
            assert!(policy.decide(&FakeDisk::undescribed()).is_allowed());
        }
    }

    #[test]
    fn listed_volume_is_always_denied() {
        let list = BlockList::new([volume_id(4), volume_id(5), volume_id(6)]);
        let policy = policy(list.clone());

        for id in list.iter() {
            assert!(!policy.decide(&FakeDisk::with_id(*id)).is_allowed());
        }
    }

    #[test]
    fn concurrent_decisions_agree() {
        let policy = policy(BlockList::single(volume_id(1)));
        let blocked = FakeDisk::with_id(volume_id(1));
        let allowed = FakeDisk::with_id(volume_id(2));

        std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|n| {
                    let policy = &policy;
                    let disk = if n % 2 == 0 { &blocked } else { &allowed };
                    scope.spawn(move || (n, policy.decide(disk)))
                })
                .collect();

            for worker in workers {
                let (n, decision) = worker.join().expect("worker panicked");
                assert_eq!(decision.is_allowed(), n % 2 == 1);
            }
        });
    }
}
