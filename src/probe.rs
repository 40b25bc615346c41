// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Point-in-time samples of memory, swap and load of the host.

mod loadavg;
mod meminfo;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use self::meminfo::MemInfo;

/// Memory and swap usage in bytes, read in one pass over meminfo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemorySample {
    pub mem_total: u64,
    pub mem_used: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadSample {
    pub one_minute_average: f64,
}

/// Read-only source of the figures the reaper decides on.
///
/// Every read may fail (unreadable procfs, permissions, transient I/O); the
/// failure is returned to the caller, which decides whether it is fatal.
pub trait SystemProbe {
    fn memory_sample(&self) -> Result<MemorySample>;
    fn load_sample(&self) -> Result<LoadSample>;
    /// Current value of `vm.swappiness`.
    fn swappiness(&self) -> Result<u32>;
}

/// Extract the parsing function for unittest.
pub fn parse_file_to_u64<R: BufRead>(reader: R) -> Result<u64> {
    let first_line = reader.lines().next().context("No content in buffer")??;
    first_line
        .trim()
        .parse()
        .with_context(|| format!("Couldn't parse \"{}\" as u64", first_line))
}

/// Get the first line in a file and parse as u64.
pub fn read_file_to_u64<P: AsRef<Path>>(filename: P) -> Result<u64> {
    let reader = File::open(filename).map(BufReader::new)?;
    parse_file_to_u64(reader)
}

/// [`SystemProbe`] backed by procfs.
///
/// All paths are resolved below `root` so tests can point the probe at a fake
/// tree. Production code uses `/`.
#[derive(Clone, Debug)]
pub struct ProcProbe {
    root: PathBuf,
}

impl Default for ProcProbe {
    fn default() -> Self {
        Self::new("/")
    }
}

impl ProcProbe {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        ProcProbe { root: root.into() }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Kernel release string, e.g. `6.1.0-13-amd64`.
    pub fn kernel_release(&self) -> Result<String> {
        let path = self.path("proc/sys/kernel/osrelease");
        let release = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(release.trim().to_string())
    }
}

impl SystemProbe for ProcProbe {
    fn memory_sample(&self) -> Result<MemorySample> {
        let path = self.path("proc/meminfo");
        let meminfo =
            MemInfo::load(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(meminfo.to_sample())
    }

    fn load_sample(&self) -> Result<LoadSample> {
        loadavg::read_loadavg(&self.path("proc/loadavg"))
    }

    fn swappiness(&self) -> Result<u32> {
        let path = self.path("proc/sys/vm/swappiness");
        let swappiness = read_file_to_u64(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        u32::try_from(swappiness).with_context(|| format!("Invalid swappiness {}", swappiness))
    }
}
