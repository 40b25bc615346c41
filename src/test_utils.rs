// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::probe::{LoadSample, MemorySample, SystemProbe};
use crate::sync::NoPoison;

/// A [`SystemProbe`] replaying scripted samples. Reads past the end of a
/// script fail like an unreadable procfs file would.
pub struct FakeProbe {
    memory: Mutex<VecDeque<Result<MemorySample>>>,
    load: Mutex<VecDeque<Result<LoadSample>>>,
    swappiness: u32,
    memory_reads: Mutex<usize>,
    load_reads: Mutex<usize>,
}

impl FakeProbe {
    pub fn new(swappiness: u32) -> Self {
        FakeProbe {
            memory: Mutex::new(VecDeque::new()),
            load: Mutex::new(VecDeque::new()),
            swappiness,
            memory_reads: Mutex::new(0),
            load_reads: Mutex::new(0),
        }
    }

    pub fn push_memory(&self, sample: MemorySample) {
        self.memory.do_lock().push_back(Ok(sample));
    }

    pub fn push_memory_error(&self) {
        self.memory
            .do_lock()
            .push_back(Err(anyhow!("Failed to read /proc/meminfo")));
    }

    pub fn push_load(&self, one_minute_average: f64) {
        self.load
            .do_lock()
            .push_back(Ok(LoadSample { one_minute_average }));
    }

    pub fn push_load_error(&self) {
        self.load
            .do_lock()
            .push_back(Err(anyhow!("Failed to read /proc/loadavg")));
    }

    pub fn memory_reads(&self) -> usize {
        *self.memory_reads.do_lock()
    }

    pub fn load_reads(&self) -> usize {
        *self.load_reads.do_lock()
    }
}

impl SystemProbe for FakeProbe {
    fn memory_sample(&self) -> Result<MemorySample> {
        *self.memory_reads.do_lock() += 1;
        self.memory
            .do_lock()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("No more memory samples")))
    }

    fn load_sample(&self) -> Result<LoadSample> {
        *self.load_reads.do_lock() += 1;
        self.load
            .do_lock()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("No more load samples")))
    }

    fn swappiness(&self) -> Result<u32> {
        Ok(self.swappiness)
    }
}
