// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::CStr;

use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use core_foundation::url::CFURL;
use core_foundation::uuid::CFUUID;
use core_foundation_sys::string::CFStringRef;
use core_foundation_sys::uuid::CFUUIDGetUUIDBytes;
use diskblock_contracts::DiskHandle;
use diskblock_types::{DiskDescription, VolumeId};

use crate::ffi::disk_arbitration::{
    DADiskCopyDescription, DADiskGetBSDName, DADiskRef, kDADiskDescriptionMediaBSDNameKey,
    kDADiskDescriptionVolumeNameKey, kDADiskDescriptionVolumePathKey,
    kDADiskDescriptionVolumeUUIDKey,
};

type Description = CFDictionary<CFString, CFType>;

/// A DiskArbitration disk reference.
///
/// Holds its own retain, so it stays valid for as long as it is alive, but
/// callers should still not keep one beyond the callback or enumeration step
/// that produced it.
pub struct DaDisk {
    disk: CFType,
}

impl DaDisk {
    /// Adopt a reference returned by a DiskArbitration `Create` function.
    ///
    /// # Safety
    /// `ptr` must be null or an owned `DADiskRef`.
    pub(crate) unsafe fn from_create_rule(ptr: DADiskRef) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        let disk = unsafe { CFType::wrap_under_create_rule(ptr as _) };
        Some(Self { disk })
    }

    /// Retain a reference borrowed from a DiskArbitration callback.
    ///
    /// # Safety
    /// `ptr` must be null or a `DADiskRef` valid for the duration of the call.
    pub(crate) unsafe fn from_get_rule(ptr: DADiskRef) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        let disk = unsafe { CFType::wrap_under_get_rule(ptr as _) };
        Some(Self { disk })
    }

    pub(crate) fn as_ptr(&self) -> DADiskRef {
        self.disk.as_CFTypeRef() as DADiskRef
    }

    pub fn bsd_name(&self) -> Option<String> {
        let name = unsafe { DADiskGetBSDName(self.as_ptr()) };
        if name.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
    }
}

impl DiskHandle for DaDisk {
    fn description(&self) -> Option<DiskDescription> {
        let desc_ref = unsafe { DADiskCopyDescription(self.as_ptr()) };
        if desc_ref.is_null() {
            tracing::debug!("could not copy description of disk {:?}", self.bsd_name());
            return None;
        }

        let description: Description = unsafe { CFDictionary::wrap_under_create_rule(desc_ref) };

        Some(DiskDescription {
            volume_name: unsafe { string_value(&description, kDADiskDescriptionVolumeNameKey) },
            volume_path: unsafe { url_value(&description, kDADiskDescriptionVolumePathKey) }
                .and_then(|url| url.to_path()),
            volume_id: unsafe { uuid_value(&description, kDADiskDescriptionVolumeUUIDKey) },
            bsd_name: unsafe { string_value(&description, kDADiskDescriptionMediaBSDNameKey) },
        })
    }
}

/// # Safety
/// `key` must be a valid CFString constant.
unsafe fn lookup(description: &Description, key: CFStringRef) -> Option<CFType> {
    let key = unsafe { CFString::wrap_under_get_rule(key) };
    description.find(&key).map(|value| (*value).clone())
}

unsafe fn string_value(description: &Description, key: CFStringRef) -> Option<String> {
    let value = unsafe { lookup(description, key) }?;
    match value.downcast::<CFString>() {
        Some(string) => Some(string.to_string()),
        None => {
            tracing::debug!("description value is not a CFString");
            None
        }
    }
}

unsafe fn url_value(description: &Description, key: CFStringRef) -> Option<CFURL> {
    unsafe { lookup(description, key) }?.downcast::<CFURL>()
}

unsafe fn uuid_value(description: &Description, key: CFStringRef) -> Option<VolumeId> {
    let Some(uuid) = unsafe { lookup(description, key) }?.downcast::<CFUUID>() else {
        tracing::debug!("volume UUID is not a CFUUID");
        return None;
    };

    let b = unsafe { CFUUIDGetUUIDBytes(uuid.as_concrete_TypeRef()) };
    Some(VolumeId::from_bytes([
        b.byte0, b.byte1, b.byte2, b.byte3, b.byte4, b.byte5, b.byte6, b.byte7, b.byte8, b.byte9,
        b.byte10, b.byte11, b.byte12, b.byte13, b.byte14, b.byte15,
    ]))
}
