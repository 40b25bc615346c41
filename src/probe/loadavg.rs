// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use procfs::{FromRead, LoadAverage};

use super::LoadSample;

fn to_sample(loadavg: &LoadAverage) -> Result<LoadSample> {
    let one_minute_average = f64::from(loadavg.one);
    if !one_minute_average.is_finite() || one_minute_average < 0.0 {
        bail!("Invalid load average {}", one_minute_average);
    }
    Ok(LoadSample { one_minute_average })
}

/// Reads the 1 minute load average from a file in /proc/loadavg format.
pub fn read_loadavg(path: &Path) -> Result<LoadSample> {
    let loadavg = LoadAverage::from_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    to_sample(&loadavg)
}
