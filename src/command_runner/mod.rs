// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::io;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error as ThisError;

mod real;
pub use real::*;

#[cfg(test)]
mod mock;
#[cfg(test)]
pub use mock::*;

#[derive(Debug, ThisError)]
pub enum RunError {
    #[error("failed to launch process: {0}")]
    Launch(#[from] io::Error),
    #[error("process did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Runs external programs to completion and collects their output.
#[async_trait]
pub trait CommandRunner: Send {
    async fn run(&mut self, cmd_name: &str, args: &[&str]) -> Result<Output, RunError>;
}
