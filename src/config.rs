// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Parsing and validation of the swap-reaper config file.
//!
//! # Minimal config
//! ```toml
//! [limits]
//! max_la = 2.0
//! ```

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use log::LevelFilter;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/swap-reaper.toml";

const DEFAULT_MAX_WAIT_SECS: u64 = 10 * 60;
const DEFAULT_LOG_PERMS: u32 = 0o644;
const MIN_MAX_LA: f64 = 0.1;
const MAX_MAX_WAIT_SECS: u64 = 24 * 3600;

/// Minimum severity written to the log.
///
/// `crit` exists for compatibility with classic daemon configs; the `log`
/// facade has no critical level so it filters like `error`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Crit,
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(level: &str) -> Result<Self> {
        Ok(match level.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "crit" => LogLevel::Crit,
            _ => bail!(
                "Unknown log level \"{}\", expected one of debug, info, warn, error, crit",
                level
            ),
        })
    }
}

impl TryFrom<String> for LogLevel {
    type Error = anyhow::Error;

    fn try_from(level: String) -> Result<Self> {
        level.parse()
    }
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error | LogLevel::Crit => LevelFilter::Error,
        }
    }
}

fn default_max_wait() -> u64 {
    DEFAULT_MAX_WAIT_SECS
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawLimits {
    max_la: f64,
    #[serde(default = "default_max_wait")]
    max_wait: u64,
    #[serde(default = "default_true")]
    defer_on_high_load: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawLog {
    file: Option<PathBuf>,
    perms: Option<String>,
    level: Option<LogLevel>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    limits: RawLimits,
    #[serde(default)]
    log: RawLog,
}

/// Thresholds of the cleaning policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    /// Cleaning is delayed while the 1 minute load average is at or above
    /// this value.
    pub max_load_average: f64,
    /// How long a high load may delay cleaning before it happens anyway.
    pub max_wait: Duration,
    /// When false, load is ignored and cleaning is never delayed.
    pub defer_on_high_load: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    /// Log file path. Logs go to syslog when unset.
    pub file: Option<PathBuf>,
    /// Mode bits used when the log file is created.
    pub perms: u32,
    pub level: LogLevel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub limits: Limits,
    pub log: LogConfig,
}

fn parse_perms(perms: &str) -> Result<u32> {
    let mode = u32::from_str_radix(perms, 8)
        .with_context(|| format!("log.perms \"{}\" is not an octal mode", perms))?;
    ensure!(mode <= 0o777, "log.perms \"{}\" is out of range", perms);
    Ok(mode)
}

fn validate_log_file(file: &Path) -> Result<()> {
    ensure!(
        file.is_absolute(),
        "log.file '{}' must be an absolute path",
        file.display()
    );
    let dir = file
        .parent()
        .with_context(|| format!("log.file '{}' has no directory", file.display()))?;
    ensure!(
        dir.is_dir(),
        "Log directory '{}' doesn't exist or is not a directory",
        dir.display()
    );
    ensure!(
        can_create_files_in(dir)?,
        "Log directory '{}' is not writable",
        dir.display()
    );
    Ok(())
}

fn can_create_files_in(dir: &Path) -> Result<bool> {
    let path = CString::new(dir.as_os_str().as_bytes())
        .with_context(|| format!("Invalid path '{}'", dir.display()))?;
    // Safe because path is a valid NUL terminated string that outlives the call.
    let ret = unsafe { libc::access(path.as_ptr(), libc::W_OK | libc::X_OK) };
    Ok(ret == 0)
}

impl RawConfig {
    fn validate(self) -> Result<Config> {
        let limits = self.limits;
        ensure!(
            limits.max_la.is_finite() && limits.max_la > MIN_MAX_LA,
            "limits.max_la must be greater than {}",
            MIN_MAX_LA
        );
        ensure!(
            limits.max_wait > 1 && limits.max_wait < MAX_MAX_WAIT_SECS,
            "limits.max_wait must be greater than 1 and less than {} seconds",
            MAX_MAX_WAIT_SECS
        );

        if let Some(file) = &self.log.file {
            validate_log_file(file)?;
        }
        let perms = match &self.log.perms {
            Some(perms) => parse_perms(perms)?,
            None => DEFAULT_LOG_PERMS,
        };

        Ok(Config {
            limits: Limits {
                max_load_average: limits.max_la,
                max_wait: Duration::from_secs(limits.max_wait),
                defer_on_high_load: limits.defer_on_high_load,
            },
            log: LogConfig {
                file: self.log.file,
                perms,
                level: self.log.level.unwrap_or(LogLevel::Info),
            },
        })
    }
}

/// Parse and validate config file contents.
pub fn parse(contents: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(contents).context("Can't parse configuration")?;
    raw.validate()
        .map_err(|err| err.context("Configuration file validation error"))
}

/// Read the config file at `path`.
pub fn read(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Can't load configuration from '{}'", path.display()))?;
    parse(&contents).with_context(|| format!("Invalid configuration '{}'", path.display()))
}
