// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! swap-reaper periodically moves swapped pages back into memory when the
//! host has room for them.
//!
//! The configuration is read from `/etc/swap-reaper.toml` unless another file
//! is passed with `--config`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use getopts::Options;
use log::{error, info};
use swap_reaper::config::{self, DEFAULT_CONFIG_PATH};
use swap_reaper::daemon::{self, VERSION};
use swap_reaper::logger::{self, IDENT};
use swap_reaper::probe::ProcProbe;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    let mut opts = Options::new();
    opts.optopt("c", "config", "Path to configuration file", "FILE");
    opts.optflag("h", "help", "Show this help message");
    opts.optflag("v", "version", "Show version");
    opts.optflag(
        "V",
        "verbose-version",
        "Show version and information about the system",
    );

    let matches = opts
        .parse(std::env::args().skip(1))
        .context("Options parsing errors")?;

    if matches.opt_present("h") {
        print!("{}", opts.usage(&format!("Usage: {} [options]", IDENT)));
        return Ok(());
    }
    if matches.opt_present("v") {
        println!("{} {}", IDENT, VERSION);
        return Ok(());
    }
    if matches.opt_present("V") {
        println!("{}", daemon::verbose_version(&ProcProbe::default()));
        return Ok(());
    }

    daemon::check_user()?;

    let config_path = matches
        .opt_str("c")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = config::read(&config_path)?;
    logger::init(&config.log).context("Failed to initialize logger")?;

    info!("{} {} starting…", IDENT, VERSION);

    let rt = Builder::new_current_thread().enable_all().build()?;
    if let Err(err) = rt.block_on(daemon::run(config)) {
        error!("{:#}", err);
        logger::flush();
        return Err(err);
    }

    info!("{} stopped", IDENT);
    logger::flush();
    Ok(())
}
