// SPDX-License-Identifier: GPL-3.0-only

use diskblock_contracts::MemorySampler;

use crate::ffi::mach::{
    KERN_SUCCESS, MACH_TASK_BASIC_INFO, MACH_TASK_BASIC_INFO_COUNT, integer_t,
    mach_task_basic_info, mach_task_self_, task_info,
};

/// Resident memory of the current task from `task_info(MACH_TASK_BASIC_INFO)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MachMemorySampler;

impl MemorySampler for MachMemorySampler {
    fn resident_bytes(&self) -> Option<u64> {
        let mut info = mach_task_basic_info::default();
        let mut count = MACH_TASK_BASIC_INFO_COUNT;

        let result = unsafe {
            task_info(
                mach_task_self_,
                MACH_TASK_BASIC_INFO,
                (&raw mut info).cast::<integer_t>(),
                &mut count,
            )
        };

        if result != KERN_SUCCESS {
            tracing::debug!("task_info failed: {result}");
            return None;
        }

        let resident = info.resident_size;
        Some(resident)
    }
}
