// SPDX-License-Identifier: GPL-3.0-only

//! Contracts between the decision core and the operating system
//!
//! The core only ever talks to the OS through these traits. The macOS adapter
//! in `diskblock-sys` implements them on top of DiskArbitration and
//! CoreFoundation; `diskblock-testing` implements them in memory.

pub mod error;
pub mod traits;

pub use error::{ArbitrationError, Result};
pub use traits::{
    ArbitrationBackend, ArbitrationSession, DiskHandle, EventLoop, MemorySampler, MountPolicy,
    PeriodicTask,
};
