// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use super::MemorySample;

fn kib_to_bytes(kib: u64) -> u64 {
    kib.saturating_mul(1024)
}

/// Struct to hold parsed /proc/meminfo data in KiB, only contains used fields.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub s_reclaimable: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

impl MemInfo {
    /// Load a meminfo file and parse it.
    pub fn load(path: &Path) -> io::Result<Self> {
        let reader = File::open(path)?;
        let reader = BufReader::new(reader);
        Self::parse(reader)
    }

    fn parse<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut result = Self::default();
        for line in reader.lines() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            let Some(key) = tokens.next() else {
                continue;
            };
            let field = match key {
                "MemTotal:" => &mut result.total,
                "MemFree:" => &mut result.free,
                "Buffers:" => &mut result.buffers,
                "Cached:" => &mut result.cached,
                "SReclaimable:" => &mut result.s_reclaimable,
                "SwapTotal:" => &mut result.swap_total,
                "SwapFree:" => &mut result.swap_free,
                _ => continue,
            };
            let Some(value) = tokens.next() else {
                continue;
            };
            let Ok(value) = value.parse::<u64>() else {
                continue;
            };
            *field = value;
        }
        Ok(result)
    }

    /// Converts to a byte based sample. Page cache and reclaimable slab are
    /// not counted as used memory.
    pub fn to_sample(&self) -> MemorySample {
        let reclaimable = self
            .free
            .saturating_add(self.buffers)
            .saturating_add(self.cached)
            .saturating_add(self.s_reclaimable);
        MemorySample {
            mem_total: kib_to_bytes(self.total),
            mem_used: kib_to_bytes(self.total.saturating_sub(reclaimable)),
            swap_total: kib_to_bytes(self.swap_total),
            swap_used: kib_to_bytes(self.swap_total.saturating_sub(self.swap_free)),
        }
    }
}
