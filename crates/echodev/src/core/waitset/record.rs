// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Waiter record: the registration token for one pending caller.

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::Arc;

/// Readiness condition a waiter is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    /// The slot holds a message (`length > 0`).
    Read,
    /// The slot accepts a write. Always true in this device; writers never
    /// block and excess input truncates.
    Write,
}

/// Lifecycle state of a waiter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Queued in the wait set, wake not yet delivered.
    Pending,
    /// The engine fired the wake; the record left the set.
    Signaled,
    /// The caller canceled; the record left the set.
    Detached,
}

const STATE_PENDING: u8 = 0;
const STATE_SIGNALED: u8 = 1;
const STATE_DETACHED: u8 = 2;

/// Trait implemented by wake signals handed to waiter records.
///
/// The engine calls `wake()` exactly once per record, while holding the slot
/// guard. Implementations must not block and must not call back into the
/// engine.
pub trait WakeSignal: Send + Sync {
    /// Deliver the wake to the owning caller.
    fn wake(&self);
}

/// One pending caller interested in a readiness condition.
///
/// Created on subscribe. The engine transitions it to `Signaled` on the write
/// path; the caller's cancel path transitions it to `Detached`. Both
/// transitions happen under the slot guard, so exactly one side wins and a
/// record is never woken and detached. Terminal records are never re-queued.
pub struct Waiter {
    id: u64,
    interest: Interest,
    state: AtomicU8,
    signal: Arc<dyn WakeSignal>,
}

impl Waiter {
    /// Create a fresh record in the `Pending` state.
    pub fn new(interest: Interest, signal: Arc<dyn WakeSignal>) -> Arc<Self> {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        Arc::new(Self {
            id,
            interest,
            state: AtomicU8::new(STATE_PENDING),
            signal,
        })
    }

    /// Stable identifier for this record.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Condition this record is waiting for.
    pub fn interest(&self) -> Interest {
        self.interest
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WaitState {
        match self.state.load(Ordering::Acquire) {
            STATE_SIGNALED => WaitState::Signaled,
            STATE_DETACHED => WaitState::Detached,
            _ => WaitState::Pending,
        }
    }

    /// Mark signaled and fire the wake. Called under the slot guard; returns
    /// false if the record already reached a terminal state.
    pub(crate) fn signal(&self) -> bool {
        let won = self
            .state
            .compare_exchange(
                STATE_PENDING,
                STATE_SIGNALED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if won {
            self.signal.wake();
        }
        won
    }

    /// Mark detached. Called under the slot guard; returns false if the
    /// record already reached a terminal state.
    pub(crate) fn detach(&self) -> bool {
        self.state
            .compare_exchange(
                STATE_PENDING,
                STATE_DETACHED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl std::fmt::Debug for Waiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waiter")
            .field("id", &self.id)
            .field("interest", &self.interest)
            .field("state", &self.state())
            .finish()
    }
}
