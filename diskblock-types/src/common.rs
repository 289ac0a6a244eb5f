// SPDX-License-Identifier: GPL-3.0-only

//! Formatting helpers shared across the stack

use num_format::{Locale, ToFormattedString};

const MIB: f64 = 1024. * 1024.;
const GIB: f64 = MIB * 1024.;

/// Convert a memory footprint to binary megabytes or gigabytes
/// (e.g. "12.50 MB (13,107,200 bytes)").
///
/// The unit never drops below MB so successive reports of a small process
/// stay comparable at a glance.
pub fn memory_to_pretty(bytes: u64) -> String {
    let val = bytes as f64;
    let (scaled, unit) = if val < GIB {
        (val / MIB, "MB")
    } else {
        (val / GIB, "GB")
    };

    format!(
        "{:.2} {} ({} bytes)",
        scaled,
        unit,
        bytes.to_formatted_string(&Locale::en)
    )
}
