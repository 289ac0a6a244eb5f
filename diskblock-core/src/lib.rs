// SPDX-License-Identifier: GPL-3.0-only

//! Mount-approval decision core
//!
//! Everything that decides whether a volume may stay mounted lives here, free
//! of any platform binding:
//!
//! - [`matcher`]: pure identity comparison against the block list
//! - [`inspector`]: pulls the volume identifier out of a disk handle
//! - [`sweeper`]: unmounts blocked volumes that were mounted before start-up
//! - [`approval`]: the policy the OS consults for every mount attempt
//! - [`controller`]: owns the arbitration session and sequences start-up
//! - [`memory`]: periodic resident-memory report

pub mod approval;
pub mod controller;
pub mod error;
pub mod inspector;
pub mod matcher;
pub mod memory;
pub mod sweeper;

pub use approval::{BlockListPolicy, DENY_REASON};
pub use controller::{ControllerState, SessionController};
pub use error::{ControllerError, Result};
pub use inspector::{Inspection, inspect, resolve_identifier};
pub use matcher::is_blocked;
pub use memory::MemoryMonitor;
pub use sweeper::{SweepReport, sweep};
