// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod command_runner;
pub mod config;
pub mod daemon;
mod format;
pub mod logger;
pub mod policy;
pub mod probe;
pub mod reaper;
pub mod swap_cycler;
mod sync;

#[cfg(test)]
mod test_utils;
