// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Log sinks for the daemon: an append-only log file that can be reopened
//! after rotation, or syslog when no file is configured.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;
use syslog::{BasicLogger, Facility, Formatter3164};

use crate::config::LogConfig;
use crate::sync::NoPoison;

pub const IDENT: &str = "swap-reaper";

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

static FILE_LOGGER: OnceCell<FileLogger> = OnceCell::new();

pub struct FileLogger {
    path: PathBuf,
    perms: u32,
    level: LevelFilter,
    file: Mutex<File>,
}

fn open_log_file(path: &Path, perms: u32) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(perms)
        .open(path)
}

impl FileLogger {
    pub fn open(path: &Path, perms: u32, level: LevelFilter) -> Result<Self> {
        let file = open_log_file(path, perms)
            .with_context(|| format!("Can't open log file '{}'", path.display()))?;
        Ok(FileLogger {
            path: path.to_path_buf(),
            perms,
            level,
            file: Mutex::new(file),
        })
    }

    /// Closes the current file and opens `path` again, creating it if it
    /// was moved away. The old file stays in use if opening fails.
    pub fn reopen(&self) -> Result<()> {
        let file = open_log_file(&self.path, self.perms)
            .with_context(|| format!("Can't reopen log file '{}'", self.path.display()))?;
        let mut current = self.file.do_lock();
        let _ = current.flush();
        *current = file;
        Ok(())
    }

    fn format_record(record: &Record) -> String {
        format!(
            "{} [{}] {}\n",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            record.level(),
            record.args()
        )
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format_record(record);
        // Nowhere to report a failing log write.
        let _ = self.file.do_lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = self.file.do_lock().flush();
    }
}

fn init_syslog() -> Result<()> {
    let formatter = Formatter3164 {
        facility: Facility::LOG_DAEMON,
        hostname: None,
        process: IDENT.to_string(),
        pid: std::process::id(),
    };
    let logger =
        syslog::unix(formatter).map_err(|err| anyhow!("Unable to connect to syslog: {}", err))?;
    log::set_boxed_logger(Box::new(BasicLogger::new(logger)))
        .context("Failed to install syslog logger")
}

/// Installs the global logger described by `config`. Can only succeed once
/// per process.
pub fn init(config: &LogConfig) -> Result<()> {
    let level = config.level.to_level_filter();
    match &config.file {
        Some(path) => {
            let logger =
                FILE_LOGGER.get_or_try_init(|| FileLogger::open(path, config.perms, level))?;
            log::set_logger(logger).context("Failed to install file logger")?;
        }
        None => init_syslog()?,
    }
    log::set_max_level(level);
    Ok(())
}

/// Reopens the log file, e.g. after logrotate moved it. Returns false when
/// logging to syslog, which needs no reopening.
pub fn reopen() -> Result<bool> {
    match FILE_LOGGER.get() {
        Some(logger) => logger.reopen().map(|_| true),
        None => Ok(false),
    }
}

pub fn flush() {
    log::logger().flush();
}
