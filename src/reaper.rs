// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The periodic check deciding when swap gets cleaned.
//!
//! Every [`TICK_PERIOD`] the reaper samples memory and swap usage. Cleaning
//! happens when there is used swap, enough free memory to take the swapped
//! pages back, and the system is not busy. A high load delays cleaning for at
//! most [`Limits::max_wait`], after which swap is cleaned anyway.

use std::future::Future;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use tokio::time::MissedTickBehavior;

use crate::command_runner::CommandRunner;
use crate::config::Limits;
use crate::format::{percent, pretty_duration, pretty_size};
use crate::policy::{compute_watermark, has_swap_to_clean, is_safe_to_clean};
use crate::probe::SystemProbe;
use crate::swap_cycler;

pub const TICK_PERIOD: Duration = Duration::from_secs(60);

/// What a single tick decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A probe read failed, nothing changed.
    ProbeFailed,
    /// No swap in use.
    NoSwap,
    /// Used memory plus used swap is above the watermark.
    NotEnoughMemory,
    /// First tick with high load, the wait for a lower load starts now.
    Deferred,
    /// Load is still high and the wait budget is not used up.
    Waiting,
    Cleaned,
    CleanFailed,
}

pub struct Reaper<P, R> {
    probe: P,
    runner: R,
    limits: Limits,
    swappiness: u32,
    /// Computed from the first sample with a non-zero total and kept for the
    /// process lifetime.
    watermark: Option<u64>,
    /// Set while cleaning is delayed by high load.
    pending_since: Option<Instant>,
}

impl<P: SystemProbe, R: CommandRunner> Reaper<P, R> {
    /// `swappiness` is read once at startup; changes of `vm.swappiness` are
    /// picked up after a restart.
    pub fn new(probe: P, runner: R, limits: Limits, swappiness: u32) -> Self {
        Reaper {
            probe,
            runner,
            limits,
            swappiness,
            watermark: None,
            pending_since: None,
        }
    }

    pub fn watermark(&self) -> Option<u64> {
        self.watermark
    }

    pub fn pending_since(&self) -> Option<Instant> {
        self.pending_since
    }

    /// Runs one check at time `now`.
    pub async fn tick(&mut self, now: Instant) -> TickOutcome {
        let mem = match self.probe.memory_sample() {
            Ok(mem) => mem,
            Err(err) => {
                error!("Can't get system memory usage: {:#}", err);
                return TickOutcome::ProbeFailed;
            }
        };

        let watermark = match self.watermark {
            Some(watermark) => watermark,
            None if mem.mem_total == 0 => {
                error!("System memory usage reports no memory at all");
                return TickOutcome::ProbeFailed;
            }
            None => {
                let watermark = compute_watermark(mem.mem_total, self.swappiness);
                self.watermark = Some(watermark);
                watermark
            }
        };

        debug!(
            "Memory: {} / {} | Swap: {} / {} | Swappiness: {}% (≤ {})",
            pretty_size(mem.mem_used),
            pretty_size(mem.mem_total),
            pretty_size(mem.swap_used),
            pretty_size(mem.swap_total),
            self.swappiness,
            pretty_size(watermark),
        );

        if !has_swap_to_clean(mem.swap_used) {
            return TickOutcome::NoSwap;
        }

        if !is_safe_to_clean(mem.mem_used, mem.swap_used, watermark) {
            warn!(
                "Not enough memory to clean up swap: used ({}) + swap ({}) > {} (swappiness {}%)",
                pretty_size(mem.mem_used),
                pretty_size(mem.swap_used),
                pretty_size(watermark),
                self.swappiness,
            );
            return TickOutcome::NotEnoughMemory;
        }

        let load = match self.probe.load_sample() {
            Ok(load) => load,
            Err(err) => {
                error!("Can't check system LA: {:#}", err);
                return TickOutcome::ProbeFailed;
            }
        };
        debug!(
            "Load average: {:.2} (limit {:.2})",
            load.one_minute_average, self.limits.max_load_average
        );

        if self.limits.defer_on_high_load
            && load.one_minute_average >= self.limits.max_load_average
        {
            match self.pending_since {
                None => {
                    self.pending_since = Some(now);
                    warn!(
                        "System LA is too big ({:.2} ≥ {:.2}), cleaning is delayed (max wait: {})",
                        load.one_minute_average,
                        self.limits.max_load_average,
                        pretty_duration(self.limits.max_wait),
                    );
                    return TickOutcome::Deferred;
                }
                Some(since) if now.saturating_duration_since(since) < self.limits.max_wait => {
                    return TickOutcome::Waiting;
                }
                Some(_) => warn!(
                    "System LA is too big ({:.2} ≥ {:.2}), but the maximum wait limit ({}) is \
                     reached. Clean anyway…",
                    load.one_minute_average,
                    self.limits.max_load_average,
                    pretty_duration(self.limits.max_wait),
                ),
            }
        }

        info!(
            "Found swap to clean ({}), cleaning…",
            pretty_size(mem.swap_used)
        );

        let start = Instant::now();
        let result = swap_cycler::clean_swap(&mut self.runner).await;
        // Every attempt ends the current high load episode, a failed one too.
        self.pending_since = None;

        if let Err(err) = result {
            error!("{}", err);
            return TickOutcome::CleanFailed;
        }

        let took = pretty_duration(start.elapsed());
        match self.probe.memory_sample() {
            Ok(after) => info!(
                "Data successfully moved from swap to memory (took {}). Memory: {} / {} ({:.1}%)",
                took,
                pretty_size(after.mem_used),
                pretty_size(after.mem_total),
                percent(after.mem_used, after.mem_total),
            ),
            Err(_) => info!("Data successfully moved from swap to memory (took {})", took),
        }
        TickOutcome::Cleaned
    }

    /// Ticks every [`TICK_PERIOD`] until `shutdown` resolves. A tick in
    /// progress is finished before shutting down.
    pub async fn run<F: Future<Output = ()>>(&mut self, shutdown: F) {
        tokio::pin!(shutdown);
        let mut interval =
            tokio::time::interval_at(tokio::time::Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let outcome = self.tick(Instant::now()).await;
                    debug!("Tick finished: {:?}", outcome);
                }
            }
        }
    }
}

#[cfg(test)]
impl<P, R> Reaper<P, R> {
    fn probe(&self) -> &P {
        &self.probe
    }

    fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }
}
