// SPDX-License-Identifier: GPL-3.0-only

//! macOS bindings for the diskblock daemon
//!
//! Implements the `diskblock-contracts` traits on top of:
//! - DiskArbitration: session, mount approval, volume descriptions, unmount
//! - CoreFoundation: the run loop that delivers arbitration events and timers
//! - mach: resident memory of the current task
//! - IOKit: system sleep/wake notifications
//!
//! On every other target this crate is empty; the daemon refuses to start
//! there.

#[cfg(target_os = "macos")]
mod ffi;

#[cfg(target_os = "macos")]
pub mod disk;
#[cfg(target_os = "macos")]
mod dissenter;
#[cfg(target_os = "macos")]
pub mod memory;
#[cfg(target_os = "macos")]
pub mod power;
#[cfg(target_os = "macos")]
pub mod run_loop;
#[cfg(target_os = "macos")]
pub mod session;
#[cfg(target_os = "macos")]
mod volumes;

#[cfg(target_os = "macos")]
pub use disk::DaDisk;
#[cfg(target_os = "macos")]
pub use memory::MachMemorySampler;
#[cfg(target_os = "macos")]
pub use power::{PowerEvent, PowerSubscription};
#[cfg(target_os = "macos")]
pub use run_loop::RunLoop;
#[cfg(target_os = "macos")]
pub use session::{DaBackend, DaSession};
