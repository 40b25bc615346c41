// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{CommandRunner, RunError};

/// `swapoff` has to page every swapped page back in, which takes minutes on
/// large swap areas.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10 * 60);

pub struct RealCommandRunner {
    timeout: Duration,
}

impl Default for RealCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl RealCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        RealCommandRunner { timeout }
    }
}

#[async_trait]
impl CommandRunner for RealCommandRunner {
    async fn run(&mut self, cmd_name: &str, args: &[&str]) -> Result<Output, RunError> {
        // The child is killed if the timeout drops the output future.
        let mut command = Command::new(cmd_name);
        command.args(args).kill_on_drop(true);
        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(RunError::TimedOut(self.timeout)),
        }
    }
}
