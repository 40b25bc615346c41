// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::VecDeque;
use std::io;
use std::os::unix::prelude::ExitStatusExt;
use std::process::ExitStatus;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;

use super::{CommandRunner, RunError};

pub struct MockCommandInput {
    pub cmd_name: String,
    pub args: Vec<String>,
}

impl MockCommandInput {
    pub fn new(cmd_name: &str, args: &[&str]) -> Self {
        Self {
            cmd_name: cmd_name.to_owned(),
            args: args.iter().map(|&s| s.into()).collect(),
        }
    }
}

pub struct MockCommandOutput {
    pub result: Result<Output, RunError>,
}

impl MockCommandOutput {
    pub fn exited(exit_code: i32, err: &str) -> Self {
        Self {
            result: Ok(Output {
                // Wait status layout: the exit code lives in the second byte.
                status: ExitStatus::from_raw(exit_code << 8),
                stdout: Vec::new(),
                stderr: err.as_bytes().to_vec(),
            }),
        }
    }

    pub fn launch_failure() -> Self {
        Self {
            result: Err(RunError::Launch(io::Error::from(io::ErrorKind::NotFound))),
        }
    }

    pub fn timed_out(timeout: Duration) -> Self {
        Self {
            result: Err(RunError::TimedOut(timeout)),
        }
    }
}

/// Replays queued outputs and checks that commands are run in the expected
/// order. Unconsumed expectations fail the test when the runner is dropped.
#[derive(Default)]
pub struct MockCommandRunner {
    expectations: VecDeque<(MockCommandInput, MockCommandOutput)>,
    invocations: usize,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expectation(&mut self, inp: MockCommandInput, out: MockCommandOutput) {
        self.expectations.push_back((inp, out));
    }

    pub fn expect_swapoff(&mut self, out: MockCommandOutput) {
        self.add_expectation(MockCommandInput::new("swapoff", &["-a"]), out);
    }

    pub fn expect_swapon(&mut self, out: MockCommandOutput) {
        self.add_expectation(MockCommandInput::new("swapon", &["-a"]), out);
    }

    /// Queues a successful swapoff/swapon pair.
    pub fn expect_swap_cycle(&mut self) {
        self.expect_swapoff(MockCommandOutput::exited(0, ""));
        self.expect_swapon(MockCommandOutput::exited(0, ""));
    }

    pub fn invocations(&self) -> usize {
        self.invocations
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&mut self, cmd_name: &str, args: &[&str]) -> Result<Output, RunError> {
        let Some((inp, out)) = self.expectations.pop_front() else {
            panic!("Unexpected command {} {:?}, no expectations left", cmd_name, args);
        };
        self.invocations += 1;
        assert_eq!(cmd_name, inp.cmd_name);
        assert_eq!(args, inp.args);
        out.result
    }
}

impl Drop for MockCommandRunner {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            assert!(
                self.expectations.is_empty(),
                "{} expected commands were not run",
                self.expectations.len()
            );
        }
    }
}
