// SPDX-License-Identifier: GPL-3.0-only

pub mod arbitration;
pub mod policy;
pub mod runtime;

pub use arbitration::{ArbitrationBackend, ArbitrationSession, DiskHandle};
pub use policy::MountPolicy;
pub use runtime::{EventLoop, MemorySampler, PeriodicTask};
