// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Thresholds deciding whether a swap cleaning cycle is safe.
//!
//! Moving swapped pages back into RAM needs headroom: the sum of used memory
//! and used swap must fit below a watermark derived from total memory and
//! `vm.swappiness`.

/// Returns the maximum amount of used memory plus used swap (in bytes) at
/// which a cleaning cycle may be attempted.
///
/// `watermark = mem_total - swappiness% of mem_total`. Swappiness values above
/// 100 (allowed by newer kernels) leave no headroom at all.
pub fn compute_watermark(mem_total: u64, swappiness: u32) -> u64 {
    let reserved = (mem_total as u128 * swappiness as u128 / 100) as u64;
    mem_total.saturating_sub(reserved)
}

/// A sum that doesn't fit in 64 bits is above any watermark.
pub fn is_safe_to_clean(mem_used: u64, swap_used: u64, watermark: u64) -> bool {
    mem_used
        .checked_add(swap_used)
        .map_or(false, |used| used <= watermark)
}

pub fn has_swap_to_clean(swap_used: u64) -> bool {
    swap_used > 0
}
