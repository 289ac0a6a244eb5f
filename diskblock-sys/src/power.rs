// SPDX-License-Identifier: GPL-3.0-only

//! System sleep/wake notifications

use std::ffi::c_void;
use std::ptr;

use core_foundation::base::TCFType;
use core_foundation::runloop::{CFRunLoop, CFRunLoopSource, kCFRunLoopDefaultMode};

use crate::ffi::iokit::{
    IOAllowPowerChange, IODeregisterForSystemPower, IONotificationPortDestroy,
    IONotificationPortGetRunLoopSource, IONotificationPortRef, IORegisterForSystemPower,
    IOServiceClose, io_connect_t, io_object_t, io_service_t, kIOMessageCanSystemSleep,
    kIOMessageSystemHasPoweredOn, kIOMessageSystemWillPowerOn, kIOMessageSystemWillSleep,
    natural_t,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    WillSleep,
    CanSleep,
    WillPowerOn,
    HasPoweredOn,
}

struct Listener {
    root_port: io_connect_t,
    callback: Box<dyn Fn(PowerEvent)>,
}

unsafe extern "C" fn power_trampoline(
    refcon: *mut c_void,
    _service: io_service_t,
    message_type: natural_t,
    message_argument: *mut c_void,
) {
    let listener = unsafe { &*(refcon as *const Listener) };

    // Sleep requests are acknowledged only after the callback has seen them.
    match message_type {
        kIOMessageSystemWillSleep => {
            (listener.callback)(PowerEvent::WillSleep);
            unsafe { IOAllowPowerChange(listener.root_port, message_argument as isize) };
        }
        kIOMessageCanSystemSleep => {
            (listener.callback)(PowerEvent::CanSleep);
            unsafe { IOAllowPowerChange(listener.root_port, message_argument as isize) };
        }
        kIOMessageSystemWillPowerOn => (listener.callback)(PowerEvent::WillPowerOn),
        kIOMessageSystemHasPoweredOn => (listener.callback)(PowerEvent::HasPoweredOn),
        _ => tracing::debug!("unhandled power message {message_type:#x}"),
    }
}

/// Live registration for system power notifications on the current run loop.
/// Dropping it deregisters and frees the callback.
pub struct PowerSubscription {
    listener: *mut Listener,
    notify_port: IONotificationPortRef,
    notifier: io_object_t,
}

impl PowerSubscription {
    /// Deliver power events to `callback` on the current thread's run loop.
    /// `None` if IOKit refuses the registration.
    pub fn subscribe(callback: impl Fn(PowerEvent) + 'static) -> Option<Self> {
        let listener = Box::into_raw(Box::new(Listener {
            root_port: 0,
            callback: Box::new(callback),
        }));
        let mut notify_port: IONotificationPortRef = ptr::null_mut();
        let mut notifier: io_object_t = 0;

        let root_port = unsafe {
            IORegisterForSystemPower(
                listener.cast(),
                &mut notify_port,
                Some(power_trampoline),
                &mut notifier,
            )
        };

        if root_port == 0 {
            tracing::error!("IORegisterForSystemPower failed");
            drop(unsafe { Box::from_raw(listener) });
            return None;
        }

        unsafe { (*listener).root_port = root_port };

        let source = unsafe {
            CFRunLoopSource::wrap_under_get_rule(IONotificationPortGetRunLoopSource(notify_port))
        };
        CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopDefaultMode });

        Some(Self {
            listener,
            notify_port,
            notifier,
        })
    }
}

impl Drop for PowerSubscription {
    fn drop(&mut self) {
        unsafe {
            IODeregisterForSystemPower(&mut self.notifier);
            IONotificationPortDestroy(self.notify_port);

            let listener = Box::from_raw(self.listener);
            IOServiceClose(listener.root_port);
        }
    }
}
