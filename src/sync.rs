// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::sync::Mutex;
use std::sync::MutexGuard;

/// swap-reaper is compiled to abort on panic, so a poisoned lock can only be
/// observed in tests. Recover the guard instead of unwrapping at every call
/// site.
pub trait NoPoison<T: ?Sized> {
    fn do_lock(&self) -> MutexGuard<T>;
}

impl<T: ?Sized> NoPoison<T> for Mutex<T> {
    fn do_lock(&self) -> MutexGuard<T> {
        self.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
