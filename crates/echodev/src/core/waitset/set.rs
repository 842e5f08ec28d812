// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wait set: the collection of pending waiter records.
//!
//! The set itself is not synchronized. Every method takes `&mut self` and is
//! only called while [`crate::core::engine::ReadinessEngine`] holds the slot
//! guard, which is what makes the remove/drain race resolve to exactly one
//! winner: both sides mutate the record state under the same lock.

use std::sync::Arc;

use super::record::{Interest, WaitState, Waiter};

/// Collection of waiter records awaiting a readiness condition.
pub struct WaitSet {
    members: Vec<Arc<Waiter>>,
}

impl WaitSet {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Queue a record. Returns false without touching the set if the record
    /// is already queued or has reached a terminal state (terminal records
    /// are never re-inserted).
    pub fn insert(&mut self, waiter: Arc<Waiter>) -> bool {
        if waiter.state() != WaitState::Pending {
            return false;
        }
        if self.members.iter().any(|w| w.id() == waiter.id()) {
            return false;
        }
        self.members.push(waiter);
        true
    }

    /// Remove a record if it is still queued, marking it `Detached`.
    ///
    /// Returns false with no side effect when the record is already gone or
    /// already signaled; a cancel racing a concurrent notify must tolerate
    /// losing.
    pub fn remove(&mut self, waiter: &Waiter) -> bool {
        let Some(pos) = self.members.iter().position(|w| w.id() == waiter.id()) else {
            return false;
        };
        if !waiter.detach() {
            // Lost to a drain that already signaled it.
            return false;
        }
        self.members.swap_remove(pos);
        true
    }

    /// Atomically empty the set of every record matching `interest`, marking
    /// each one `Signaled` and firing its wake. Returns the drained records.
    pub fn drain_matching(&mut self, interest: Interest) -> Vec<Arc<Waiter>> {
        let mut drained = Vec::new();
        self.members.retain(|w| {
            if w.interest() != interest {
                return true;
            }
            if w.signal() {
                drained.push(Arc::clone(w));
            }
            false
        });
        drained
    }
}

impl Default for WaitSet {
    fn default() -> Self {
        Self::new()
    }
}
