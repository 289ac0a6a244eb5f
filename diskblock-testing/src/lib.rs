// SPDX-License-Identifier: GPL-3.0-only

//! In-memory stand-ins for the OS collaborators
//!
//! [`FakeArbitration`] plays the disk arbitration service: it holds a scripted
//! set of mounted volumes, journals every session interaction in order and can
//! dispatch simulated mount attempts to whatever policy was registered.

pub mod arbitration;
pub mod runtime;

pub use arbitration::{FakeArbitration, FakeDisk, FakeSession, SessionEvent};
pub use runtime::{FixedMemorySampler, ManualEventLoop};

use diskblock_types::VolumeId;

/// Deterministic identifier for fixtures. Every fixture shares the same first
/// fifteen bytes and differs only in the last one.
pub fn volume_id(n: u8) -> VolumeId {
    VolumeId::from_bytes([
        0x49, 0xD0, 0x00, 0x07, 0xFF, 0x63, 0x36, 0xB9, 0x9D, 0x69, 0x6B, 0x3B, 0xE1, 0x68, 0x66, n,
    ])
}
