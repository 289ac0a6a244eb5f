// SPDX-License-Identifier: GPL-3.0-only

use diskblock_contracts::DiskHandle;
use diskblock_types::{DiskDescription, VolumeId};

/// What could be learned about a disk's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    /// The disk carries a volume identifier.
    Identified {
        id: VolumeId,
        description: DiskDescription,
    },
    /// No identifier: either the OS had no description at all, or the
    /// description lacks the volume UUID (unformatted media, mid-eject).
    Unknown { description: Option<DiskDescription> },
}

impl Inspection {
    pub fn id(&self) -> Option<VolumeId> {
        match self {
            Self::Identified { id, .. } => Some(*id),
            Self::Unknown { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&DiskDescription> {
        match self {
            Self::Identified { description, .. } => Some(description),
            Self::Unknown { description } => description.as_ref(),
        }
    }
}

/// Query the OS for the disk's description and classify it.
///
/// Safe to call from an OS callback with no prior state; it performs exactly
/// one description query and nothing else.
pub fn inspect<D: DiskHandle + ?Sized>(disk: &D) -> Inspection {
    let Some(description) = disk.description() else {
        tracing::debug!("disk has no description");
        return Inspection::Unknown { description: None };
    };

    match description.volume_id {
        Some(id) => Inspection::Identified { id, description },
        None => {
            tracing::debug!("disk {} has no volume UUID", description);
            Inspection::Unknown {
                description: Some(description),
            }
        }
    }
}

pub fn resolve_identifier<D: DiskHandle + ?Sized>(disk: &D) -> Option<VolumeId> {
    inspect(disk).id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskblock_testing::{FakeDisk, volume_id};

    #[test]
    fn identified_disk_yields_its_id() {
        let disk = FakeDisk::with_id(volume_id(7));
        let inspection = inspect(&disk);

        assert_eq!(inspection.id(), Some(volume_id(7)));
        assert!(inspection.description().is_some());
    }

    #[test]
    fn missing_description_is_unknown() {
        let disk = FakeDisk::undescribed();

        assert_eq!(inspect(&disk), Inspection::Unknown { description: None });
        assert_eq!(resolve_identifier(&disk), None);
    }

    #[test]
    fn description_without_uuid_is_unknown() {
        let description = DiskDescription {
            volume_name: Some("Blank".to_string()),
            ..DiskDescription::default()
        };
        let disk = FakeDisk::new(Some(description.clone()));

        let inspection = inspect(&disk);
        assert_eq!(inspection.id(), None);
        assert_eq!(inspection.description(), Some(&description));
    }

    #[test]
    fn works_through_trait_objects() {
        let disk = FakeDisk::with_id(volume_id(3));
        let handle: &dyn DiskHandle = &disk;
        assert_eq!(resolve_identifier(handle), Some(volume_id(3)));
    }
}
