// SPDX-License-Identifier: GPL-3.0-only

//! Volume identity and the set of identities that must never mount

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persistent 128-bit identifier the OS assigns to a volume.
///
/// Two identifiers are equal only when all sixteen bytes are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeId(Uuid);

impl VolumeId {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Build an identifier from the raw byte layout the OS hands out.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl FromStr for VolumeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for VolumeId {
    // Upper-case hyphenated, the way the OS prints volume UUIDs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0.hyphenated())
    }
}

/// Immutable set of volume identifiers that are denied mounting.
///
/// Built once at start-up and shared by reference with every component that
/// classifies volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockList {
    ids: BTreeSet<VolumeId>,
}

impl BlockList {
    pub fn new(ids: impl IntoIterator<Item = VolumeId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn single(id: VolumeId) -> Self {
        Self::new([id])
    }

    pub fn contains(&self, id: &VolumeId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VolumeId> {
        self.ids.iter()
    }
}

impl fmt::Display for BlockList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = self
            .ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{ids}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: &str = "49D00007-FF63-36B9-9D69-6B3BE16866BB";

    #[test]
    fn parses_and_displays_upper_case() {
        let id: VolumeId = MONITOR.to_lowercase().parse().expect("valid uuid");
        assert_eq!(id.to_string(), MONITOR);
    }

    #[test]
    fn ids_differing_only_after_first_byte_are_distinct() {
        let a: VolumeId = MONITOR.parse().expect("valid uuid");
        let mut bytes = *a.as_bytes();
        bytes[15] ^= 0xff;
        let b = VolumeId::from_bytes(bytes);

        assert_eq!(a.as_bytes()[0], b.as_bytes()[0]);
        assert_ne!(a, b);
    }

    #[test]
    fn block_list_deduplicates() {
        let id: VolumeId = MONITOR.parse().expect("valid uuid");
        let list = BlockList::new([id, id]);
        assert_eq!(list.len(), 1);
        assert!(list.contains(&id));
        assert_eq!(list.to_string(), format!("{{{MONITOR}}}"));
    }

    #[test]
    fn volume_id_serializes_as_plain_uuid() {
        let id: VolumeId = MONITOR.parse().expect("valid uuid");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, format!("\"{}\"", MONITOR.to_lowercase()));
        let parsed: VolumeId = serde_json::from_str(&json).expect("deserialize id");
        assert_eq!(parsed, id);
    }
}
