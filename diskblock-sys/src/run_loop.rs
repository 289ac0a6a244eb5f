// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use core_foundation::base::TCFType;
use core_foundation::runloop::{
    CFRunLoop, CFRunLoopTimer, CFRunLoopTimerContext, CFRunLoopTimerRef, kCFRunLoopDefaultMode,
};
use core_foundation_sys::date::CFAbsoluteTimeGetCurrent;
use core_foundation_sys::runloop::CFRunLoopTimerInvalidate;
use diskblock_contracts::{EventLoop, PeriodicTask};

extern "C" fn timer_fired(_timer: CFRunLoopTimerRef, info: *mut c_void) {
    let task = unsafe { &mut *(info as *mut PeriodicTask) };
    if panic::catch_unwind(AssertUnwindSafe(|| task())).is_err() {
        tracing::error!("periodic task panicked");
    }
}

/// The current thread's CoreFoundation run loop.
pub struct RunLoop {
    run_loop: CFRunLoop,
    timers: Vec<(CFRunLoopTimer, *mut PeriodicTask)>,
}

impl RunLoop {
    pub fn current() -> Self {
        Self {
            run_loop: CFRunLoop::get_current(),
            timers: Vec::new(),
        }
    }
}

impl EventLoop for RunLoop {
    fn add_periodic(&mut self, interval: Duration, task: PeriodicTask) {
        let task = Box::into_raw(Box::new(task));
        let interval = interval.as_secs_f64();

        // Zeroed leaves the retain/release/copyDescription callbacks unset.
        let mut context: CFRunLoopTimerContext = unsafe { std::mem::zeroed() };
        context.info = task.cast();

        let timer = CFRunLoopTimer::new(
            unsafe { CFAbsoluteTimeGetCurrent() } + interval,
            interval,
            0,
            0,
            timer_fired,
            &mut context,
        );
        self.run_loop.add_timer(&timer, unsafe { kCFRunLoopDefaultMode });
        self.timers.push((timer, task));
    }

    fn run(&mut self) {
        CFRunLoop::run_current();
    }
}

impl Drop for RunLoop {
    fn drop(&mut self) {
        for (timer, task) in self.timers.drain(..) {
            unsafe {
                CFRunLoopTimerInvalidate(timer.as_concrete_TypeRef());
                drop(Box::from_raw(task));
            }
        }
    }
}
