// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Startup checks and signal handling around the [`Reaper`] loop.

use anyhow::{bail, ensure, Context, Result};
use log::{debug, error, info, warn};
use tokio::signal::unix::{signal, SignalKind};

use crate::command_runner::RealCommandRunner;
use crate::config::Config;
use crate::format::pretty_size;
use crate::logger::{self, IDENT};
use crate::probe::{ProcProbe, SystemProbe};
use crate::reaper::Reaper;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Swappiness above this value makes the kernel swap so eagerly that cleaning
/// has little lasting effect.
const MAX_RECOMMENDED_SWAPPINESS: u32 = 30;

pub fn check_user() -> Result<()> {
    // Safe because geteuid has no preconditions and can't fail.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        bail!("You must run this daemon as super user (root)");
    }
    Ok(())
}

/// Checks that there is swap to manage and returns the swappiness the reaper
/// works with for its whole lifetime.
pub fn check_system<P: SystemProbe>(probe: &P) -> Result<u32> {
    let mem = probe
        .memory_sample()
        .context("Can't get memory usage info")?;
    ensure!(mem.swap_total != 0, "Swap is disabled, nothing to do");

    let swappiness = probe
        .swappiness()
        .context("Can't read swappiness configuration")?;
    if swappiness > MAX_RECOMMENDED_SWAPPINESS {
        warn!(
            "The kernel parameter 'vm.swappiness' is too high ({})! A value between 5 and {} is \
             recommended.",
            swappiness, MAX_RECOMMENDED_SWAPPINESS
        );
    }
    Ok(swappiness)
}

/// Version and the host figures relevant to swap cleaning, for bug reports.
pub fn verbose_version(probe: &ProcProbe) -> String {
    let unknown = || String::from("unknown");
    let kernel = probe.kernel_release().unwrap_or_else(|_| unknown());
    let swappiness = probe
        .swappiness()
        .map(|s| s.to_string())
        .unwrap_or_else(|_| unknown());
    let (memory, swap) = match probe.memory_sample() {
        Ok(mem) => (
            format!("{} / {}", pretty_size(mem.mem_used), pretty_size(mem.mem_total)),
            format!("{} / {}", pretty_size(mem.swap_used), pretty_size(mem.swap_total)),
        ),
        Err(_) => (unknown(), unknown()),
    };
    format!(
        "{} {}\nKernel: {}\nvm.swappiness: {}\nMemory: {}\nSwap: {}",
        IDENT, VERSION, kernel, swappiness, memory, swap
    )
}

async fn reopen_log_on_hangup() -> Result<()> {
    let mut hangup =
        signal(SignalKind::hangup()).context("Failed to register HUP signal handler")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("Received HUP signal, log will be reopened…");
            match logger::reopen() {
                Ok(true) => info!("Log reopened by HUP signal"),
                Ok(false) => debug!("Logging to syslog, nothing to reopen"),
                Err(err) => error!("{:#}", err),
            }
        }
    });
    Ok(())
}

/// Runs the daemon until SIGTERM or SIGINT.
pub async fn run(config: Config) -> Result<()> {
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to register TERM signal handler")?;
    let mut interrupt =
        signal(SignalKind::interrupt()).context("Failed to register INT signal handler")?;
    reopen_log_on_hangup().await?;

    let probe = ProcProbe::default();
    let swappiness = check_system(&probe)?;
    info!("Initialization finished, monitoring system swap…");

    let shutdown = async {
        tokio::select! {
            _ = terminate.recv() => info!("Received TERM signal, shutdown…"),
            _ = interrupt.recv() => info!("Received INT signal, shutdown…"),
        }
    };
    let mut reaper = Reaper::new(
        probe,
        RealCommandRunner::default(),
        config.limits,
        swappiness,
    );
    reaper.run(shutdown).await;
    logger::flush();
    Ok(())
}
