// SPDX-License-Identifier: GPL-3.0-only

use std::ptr;

use core_foundation::base::{TCFType, kCFAllocatorDefault};
use core_foundation::string::CFString;

use crate::ffi::disk_arbitration::{
    DADissenterCreate, DADissenterGetStatus, DADissenterGetStatusString, DADissenterRef,
    kDAReturnExclusiveAccess,
};

/// Create a dissenter for a vetoed mount. DiskArbitration takes ownership of
/// the returned reference.
///
/// Yields null (which lets the mount through) only if the framework cannot
/// allocate the dissenter.
pub(crate) fn create(reason: &str) -> DADissenterRef {
    let reason = CFString::new(reason);
    let dissenter = unsafe {
        DADissenterCreate(
            kCFAllocatorDefault,
            kDAReturnExclusiveAccess,
            reason.as_concrete_TypeRef(),
        )
    };

    if dissenter.is_null() {
        tracing::error!("DADissenterCreate returned null, mount cannot be vetoed");
        return ptr::null();
    }

    dissenter
}

/// Status code and optional message of a dissenter the framework handed us.
///
/// # Safety
/// `dissenter` must be a non-null dissenter valid for the duration of the call.
pub(crate) unsafe fn describe(dissenter: DADissenterRef) -> (i32, Option<String>) {
    let status = unsafe { DADissenterGetStatus(dissenter) };
    let message = unsafe { DADissenterGetStatusString(dissenter) };
    let message = (!message.is_null())
        .then(|| unsafe { CFString::wrap_under_get_rule(message) }.to_string());
    (status, message)
}
