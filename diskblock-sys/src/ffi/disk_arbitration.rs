// SPDX-License-Identifier: GPL-3.0-only

#![allow(non_upper_case_globals)]

use std::ffi::{c_char, c_void};

use core_foundation_sys::base::CFAllocatorRef;
use core_foundation_sys::dictionary::CFDictionaryRef;
use core_foundation_sys::runloop::CFRunLoopRef;
use core_foundation_sys::string::CFStringRef;
use core_foundation_sys::url::CFURLRef;

use super::{err_sub, err_system};

pub type DADiskRef = *mut c_void;
pub type DADissenterRef = *const c_void;
pub type DASessionRef = *mut c_void;
pub type DAReturn = i32;

pub type DADiskMountApprovalCallback =
    extern "C" fn(disk: DADiskRef, context: *mut c_void) -> DADissenterRef;

pub type DADiskUnmountCallback =
    extern "C" fn(disk: DADiskRef, dissenter: DADissenterRef, context: *mut c_void);

const err_local: u32 = err_system(0x3e);
const err_local_diskarbitration: u32 = err_sub(0x368);

// DiskArbitration.framework/Headers/DADissenter.h
pub const kDAReturnExclusiveAccess: DAReturn =
    (err_local | err_local_diskarbitration | 0x04) as DAReturn;

pub const kDADiskUnmountOptionDefault: u32 = 0x00000000;

#[link(name = "DiskArbitration", kind = "framework")]
unsafe extern "C" {
    pub static kDADiskDescriptionVolumeNameKey: CFStringRef;
    pub static kDADiskDescriptionVolumePathKey: CFStringRef;
    pub static kDADiskDescriptionVolumeUUIDKey: CFStringRef;
    pub static kDADiskDescriptionMediaBSDNameKey: CFStringRef;

    pub fn DASessionCreate(allocator: CFAllocatorRef) -> DASessionRef;

    pub fn DASessionScheduleWithRunLoop(
        session: DASessionRef,
        run_loop: CFRunLoopRef,
        mode: CFStringRef,
    );

    pub fn DASessionUnscheduleFromRunLoop(
        session: DASessionRef,
        run_loop: CFRunLoopRef,
        mode: CFStringRef,
    );

    pub fn DARegisterDiskMountApprovalCallback(
        session: DASessionRef,
        match_: CFDictionaryRef,
        callback: DADiskMountApprovalCallback,
        context: *mut c_void,
    );

    pub fn DAUnregisterApprovalCallback(
        session: DASessionRef,
        callback: *mut c_void,
        context: *mut c_void,
    );

    pub fn DADiskCreateFromVolumePath(
        allocator: CFAllocatorRef,
        session: DASessionRef,
        path: CFURLRef,
    ) -> DADiskRef;

    pub fn DADiskCopyDescription(disk: DADiskRef) -> CFDictionaryRef;

    pub fn DADiskGetBSDName(disk: DADiskRef) -> *const c_char;

    pub fn DADiskUnmount(
        disk: DADiskRef,
        options: u32,
        callback: Option<DADiskUnmountCallback>,
        context: *mut c_void,
    );

    pub fn DADissenterCreate(
        allocator: CFAllocatorRef,
        status: DAReturn,
        string: CFStringRef,
    ) -> DADissenterRef;

    pub fn DADissenterGetStatus(dissenter: DADissenterRef) -> DAReturn;

    pub fn DADissenterGetStatusString(dissenter: DADissenterRef) -> CFStringRef;
}
