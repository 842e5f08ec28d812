// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Blocking wake signal for callers that want to park.
//!
//! The engine itself never blocks: subscribe returns `Pending` and the caller
//! parks on its own signal. `ParkSignal` is the ready-made signal for that,
//! backed by a mutex and condvar so it stays portable across platforms.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::record::WakeSignal;

/// Condvar-backed [`WakeSignal`] with a consuming timed wait.
pub struct ParkSignal {
    fired: Mutex<bool>,
    cond: Condvar,
}

impl ParkSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fired: Mutex::new(false),
            cond: Condvar::new(),
        })
    }

    /// Block until the signal fires or `timeout` elapses.
    ///
    /// Returns true if the wake arrived, consuming it so the signal can be
    /// reused; false on timeout. A wake delivered before the wait is not
    /// lost.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut fired = self.fired.lock();
        while !*fired {
            if self.cond.wait_until(&mut fired, deadline).timed_out() && !*fired {
                return false;
            }
        }
        *fired = false;
        true
    }

    /// Non-blocking check, consuming the wake if present.
    pub fn take(&self) -> bool {
        let mut fired = self.fired.lock();
        std::mem::replace(&mut *fired, false)
    }
}

impl WakeSignal for ParkSignal {
    fn wake(&self) {
        let mut fired = self.fired.lock();
        *fired = true;
        self.cond.notify_all();
    }
}
