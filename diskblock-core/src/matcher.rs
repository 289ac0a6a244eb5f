// SPDX-License-Identifier: GPL-3.0-only

use diskblock_types::{BlockList, VolumeId};

/// Whether `id` is on the block list. Full 128-bit comparison.
pub fn is_blocked(id: &VolumeId, block_list: &BlockList) -> bool {
    block_list.contains(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskblock_testing::volume_id;

    #[test]
    fn id_is_blocked_by_list_containing_it() {
        let u1 = volume_id(1);
        assert!(is_blocked(&u1, &BlockList::single(u1)));
    }

    #[test]
    fn other_ids_are_not_blocked() {
        let u1 = volume_id(1);
        for n in 2..64 {
            assert!(!is_blocked(&volume_id(n), &BlockList::single(u1)));
        }
    }

    #[test]
    fn shared_first_byte_is_not_a_match() {
        let u1 = volume_id(1);
        let mut bytes = *u1.as_bytes();
        bytes[8] = bytes[8].wrapping_add(1);
        let lookalike = VolumeId::from_bytes(bytes);

        assert!(!is_blocked(&lookalike, &BlockList::single(u1)));
    }

    #[test]
    fn empty_list_blocks_nothing() {
        assert!(!is_blocked(&volume_id(1), &BlockList::default()));
    }

    #[test]
    fn any_member_of_a_larger_list_is_blocked() {
        let list = BlockList::new([volume_id(1), volume_id(2), volume_id(3)]);
        assert!(is_blocked(&volume_id(2), &list));
        assert!(!is_blocked(&volume_id(4), &list));
    }
}
