// SPDX-License-Identifier: GPL-3.0-only

#![allow(non_camel_case_types, non_upper_case_globals)]

use std::ffi::{c_uint, c_void};

use core_foundation_sys::runloop::CFRunLoopSourceRef;

pub type io_object_t = u32;
pub type io_service_t = io_object_t;
pub type io_connect_t = io_object_t;
pub type natural_t = c_uint;

pub type IONotificationPortRef = *mut c_void;

pub type IOServiceInterestCallback = Option<
    unsafe extern "C" fn(
        refcon: *mut c_void,
        service: io_service_t,
        message_type: natural_t,
        message_argument: *mut c_void,
    ),
>;

// IOKit/IOReturn.h
const sys_iokit: u32 = super::err_system(0x38);
const sub_iokit_common: u32 = super::err_sub(0);

// IOKit/IOMessage.h
const fn iokit_common_msg(message: u32) -> u32 {
    sys_iokit | sub_iokit_common | message
}

pub const kIOMessageCanSystemSleep: u32 = iokit_common_msg(0x270);
pub const kIOMessageSystemWillSleep: u32 = iokit_common_msg(0x280);
pub const kIOMessageSystemHasPoweredOn: u32 = iokit_common_msg(0x300);
pub const kIOMessageSystemWillPowerOn: u32 = iokit_common_msg(0x320);

#[link(name = "IOKit", kind = "framework")]
unsafe extern "C" {
    pub fn IORegisterForSystemPower(
        refcon: *mut c_void,
        notify_port: *mut IONotificationPortRef,
        callback: IOServiceInterestCallback,
        notifier: *mut io_object_t,
    ) -> io_connect_t;

    pub fn IODeregisterForSystemPower(notifier: *mut io_object_t) -> i32;

    pub fn IOAllowPowerChange(kernel_port: io_connect_t, notification_id: isize) -> i32;

    pub fn IONotificationPortGetRunLoopSource(notify: IONotificationPortRef)
    -> CFRunLoopSourceRef;

    pub fn IONotificationPortDestroy(notify: IONotificationPortRef);

    pub fn IOServiceClose(connect: io_connect_t) -> i32;
}
