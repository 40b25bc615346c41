// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Moves swapped pages back into memory by turning all swap areas off and on.

use std::process::{ExitStatus, Output};
use std::time::Duration;

use log::debug;
use thiserror::Error as ThisError;

use crate::command_runner::{CommandRunner, RunError};

const SWAPOFF_CMD: &str = "swapoff";
const SWAPON_CMD: &str = "swapon";

#[derive(Debug, ThisError)]
pub enum StepError {
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: &'static str,
        source: std::io::Error,
    },
    #[error("{command} exited with {status}{stderr}")]
    ExitedNonZero {
        command: &'static str,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{command} stalled, no result within {timeout:?}")]
    Stalled {
        command: &'static str,
        timeout: Duration,
    },
}

#[derive(Debug, ThisError)]
pub enum SwapCycleError {
    /// swapon was not attempted. Swap may be partly disabled when swapoff
    /// failed or was killed after some areas were already turned off.
    #[error("Can't disable swap using swapoff: {0}")]
    Disable(StepError),
    /// Swap was disabled but could not be turned back on. Needs an operator.
    #[error("Can't enable swap back using swapon, swap is left disabled: {0}")]
    Enable(StepError),
}

async fn run_step<R: CommandRunner + ?Sized>(
    runner: &mut R,
    command: &'static str,
) -> Result<(), StepError> {
    debug!("Running {} -a", command);
    match runner.run(command, &["-a"]).await {
        Ok(Output { status, stderr, .. }) if !status.success() => {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            Err(StepError::ExitedNonZero {
                command,
                status,
                stderr: if stderr.is_empty() {
                    stderr
                } else {
                    format!(": {}", stderr)
                },
            })
        }
        Ok(_) => Ok(()),
        Err(RunError::Launch(source)) => Err(StepError::Launch { command, source }),
        Err(RunError::TimedOut(timeout)) => Err(StepError::Stalled { command, timeout }),
    }
}

/// Disables all swap areas and, only if that succeeded, enables them again.
///
/// Keeps no state between calls.
pub async fn clean_swap<R: CommandRunner + ?Sized>(runner: &mut R) -> Result<(), SwapCycleError> {
    run_step(runner, SWAPOFF_CMD)
        .await
        .map_err(SwapCycleError::Disable)?;
    run_step(runner, SWAPON_CMD)
        .await
        .map_err(SwapCycleError::Enable)
}
