// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain values for the diskblock daemon
//!
//! These types are shared by every layer of the stack:
//!
//! - **diskblock-sys**: decodes native disk descriptions into [`DiskDescription`]
//! - **diskblock-core**: makes mount decisions from [`VolumeId`] and [`BlockList`]
//! - **diskblock-service**: configures the compiled-in [`BlockList`]
//!
//! None of these values own operating-system resources; they are plain data
//! copied out of the OS at the moment they are needed.

pub mod common;
pub mod decision;
pub mod disk;
pub mod volume;

pub use common::memory_to_pretty;
pub use decision::Decision;
pub use disk::DiskDescription;
pub use volume::{BlockList, VolumeId};
