// SPDX-License-Identifier: GPL-3.0-only

//! Decoded disk description
//!
//! The OS describes a disk with a loosely typed dictionary. This is the subset
//! diskblock reads from it, already converted to owned Rust values so it can
//! outlive the native handle it was copied from.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::VolumeId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskDescription {
    /// Volume label (e.g. "Untitled")
    pub volume_name: Option<String>,

    /// Where the volume is mounted, if it is
    pub volume_path: Option<PathBuf>,

    /// Persistent volume identifier; absent for unformatted media
    pub volume_id: Option<VolumeId>,

    /// BSD device name (e.g. "disk4s1")
    pub bsd_name: Option<String>,
}

impl DiskDescription {
    pub fn with_volume_id(volume_id: VolumeId) -> Self {
        Self {
            volume_id: Some(volume_id),
            ..Self::default()
        }
    }

    pub fn name_or_default(&self) -> &str {
        self.volume_name.as_deref().unwrap_or("Unnamed Volume")
    }
}

impl fmt::Display for DiskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name_or_default())?;

        match &self.volume_id {
            Some(id) => write!(f, " ({id})")?,
            None => write!(f, " (unknown)")?,
        }

        if let Some(path) = &self.volume_path {
            write!(f, " {}", path.display())?;
        }

        if let Some(bsd_name) = &self.bsd_name {
            write!(f, " [{bsd_name}]")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_falls_back_for_missing_fields() {
        assert_eq!(
            DiskDescription::default().to_string(),
            "Unnamed Volume (unknown)"
        );
    }

    #[test]
    fn display_includes_every_known_field() {
        let id: VolumeId = "49D00007-FF63-36B9-9D69-6B3BE16866BB"
            .parse()
            .expect("valid uuid");
        let description = DiskDescription {
            volume_name: Some("NO NAME".to_string()),
            volume_path: Some(PathBuf::from("/Volumes/NO NAME")),
            volume_id: Some(id),
            bsd_name: Some("disk4s1".to_string()),
        };

        assert_eq!(
            description.to_string(),
            "NO NAME (49D00007-FF63-36B9-9D69-6B3BE16866BB) /Volumes/NO NAME [disk4s1]"
        );
    }
}
