// SPDX-License-Identifier: GPL-3.0-only

#![allow(non_camel_case_types, non_upper_case_globals)]

pub type mach_port_t = u32;
pub type kern_return_t = i32;
pub type natural_t = u32;
pub type integer_t = i32;
pub type task_flavor_t = natural_t;
pub type mach_msg_type_number_t = natural_t;

pub const KERN_SUCCESS: kern_return_t = 0;

// mach/task_info.h
pub const MACH_TASK_BASIC_INFO: task_flavor_t = 20;

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct time_value_t {
    pub seconds: integer_t,
    pub microseconds: integer_t,
}

// Declared under `#pragma pack(4)` in mach/task_info.h.
#[repr(C, packed(4))]
#[derive(Debug, Default, Clone, Copy)]
pub struct mach_task_basic_info {
    pub virtual_size: u64,
    pub resident_size: u64,
    pub resident_size_max: u64,
    pub user_time: time_value_t,
    pub system_time: time_value_t,
    pub policy: integer_t,
    pub suspend_count: integer_t,
}

pub const MACH_TASK_BASIC_INFO_COUNT: mach_msg_type_number_t =
    (size_of::<mach_task_basic_info>() / size_of::<natural_t>()) as mach_msg_type_number_t;

unsafe extern "C" {
    pub static mach_task_self_: mach_port_t;

    pub fn task_info(
        target_task: mach_port_t,
        flavor: task_flavor_t,
        task_info_out: *mut integer_t,
        task_info_out_count: *mut mach_msg_type_number_t,
    ) -> kern_return_t;
}
