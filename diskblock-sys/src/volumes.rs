// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::{CStr, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;
use std::ptr;

/// Mount points of every mounted filesystem, from `getfsstat(2)`.
pub(crate) fn mounted_volume_paths() -> Option<Vec<PathBuf>> {
    let count = unsafe { libc::getfsstat(ptr::null_mut(), 0, libc::MNT_NOWAIT) };
    if count < 0 {
        tracing::error!("getfsstat failed: {}", io::Error::last_os_error());
        return None;
    }

    let capacity = count as usize;
    let mut entries: Vec<libc::statfs> = Vec::with_capacity(capacity);
    let buffer_size = (capacity * size_of::<libc::statfs>()) as libc::c_int;

    let filled = unsafe { libc::getfsstat(entries.as_mut_ptr(), buffer_size, libc::MNT_NOWAIT) };
    if filled < 0 {
        tracing::error!("getfsstat failed: {}", io::Error::last_os_error());
        return None;
    }

    // The kernel never writes more than `buffer_size` bytes.
    unsafe { entries.set_len((filled as usize).min(capacity)) };

    Some(
        entries
            .iter()
            .map(|entry| {
                let mount_point = unsafe { CStr::from_ptr(entry.f_mntonname.as_ptr()) };
                PathBuf::from(OsStr::from_bytes(mount_point.to_bytes()))
            })
            .collect(),
    )
}
