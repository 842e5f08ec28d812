// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Readiness-notification engine.
//!
//! Combines a level-triggered synchronous check with an edge-triggered wake
//! queue: `check_and_maybe_subscribe` answers `Ready` immediately when the
//! condition already holds and otherwise queues the waiter, while
//! `notify_after_write` drains and wakes the queued readers when a fresh
//! message lands.
//!
//! One guard spans the buffer and the wait set. The predicate check and the
//! insert happen under a single acquisition, so a writer that completes
//! between them cannot exist: either the write is visible to the check (the
//! subscriber gets `Ready`) or the waiter is queued before the writer's
//! drain runs (the subscriber gets woken). No critical section blocks and
//! none is longer than O(wait-set size).

use parking_lot::Mutex;
use std::sync::Arc;

use super::buffer::{BufferError, MessageBuffer};
use super::transfer::{UserSink, UserSource};
use super::waitset::{Interest, WaitSet, WaitState, Waiter};

/// Outcome of a subscribe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// The condition already holds; the wait set was not touched.
    Ready,
    /// The waiter is queued and will be woken when the condition flips.
    Pending,
}

struct Slot {
    buffer: MessageBuffer,
    waiters: WaitSet,
}

/// The notification engine: the single-slot buffer plus the wait set that
/// observes it, behind one guard.
pub struct ReadinessEngine {
    slot: Mutex<Slot>,
}

impl ReadinessEngine {
    /// Create an engine around a zeroed, empty slot.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                buffer: MessageBuffer::new(),
                waiters: WaitSet::new(),
            }),
        }
    }

    /// Length of the current message.
    pub fn message_len(&self) -> usize {
        self.slot.lock().buffer.message_len()
    }

    /// Number of queued waiters (diagnostic).
    pub fn pending_waiters(&self) -> usize {
        self.slot.lock().waiters.len()
    }

    /// Locked delegation to [`MessageBuffer::read_at`]. Reads never consult
    /// the wait path and never block.
    pub fn read_at(
        &self,
        offset: u64,
        sink: &mut dyn UserSink,
        max: usize,
    ) -> Result<usize, BufferError> {
        self.slot.lock().buffer.read_at(offset, sink, max)
    }

    /// Locked delegation to [`MessageBuffer::write_at`]. Waking readers is
    /// the caller's job via [`ReadinessEngine::notify_after_write`]; a
    /// subscriber landing between the write and the notify simply observes
    /// the now-true condition on its own check.
    pub fn write_at(
        &self,
        offset: u64,
        source: &mut dyn UserSource,
        resid: usize,
    ) -> Result<usize, BufferError> {
        self.slot.lock().buffer.write_at(offset, source, resid)
    }

    /// Evaluate the waiter's condition; queue it if the condition is false.
    ///
    /// READ is ready iff the slot holds a message. WRITE is always ready:
    /// nothing in this device ever blocks on writability, so the WRITE side
    /// of the set is never populated from here and never drained.
    pub fn check_and_maybe_subscribe(&self, waiter: &Arc<Waiter>) -> Subscription {
        let mut slot = self.slot.lock();

        let ready = match waiter.interest() {
            Interest::Write => true,
            Interest::Read => slot.buffer.message_len() > 0,
        };
        if ready {
            return Subscription::Ready;
        }

        // A record that already resolved is never re-queued.
        if waiter.state() != WaitState::Pending {
            log::debug!(
                "[notify] waiter {} already {:?}, not re-queued",
                waiter.id(),
                waiter.state()
            );
            return Subscription::Ready;
        }

        if slot.waiters.insert(Arc::clone(waiter)) {
            log::debug!("[notify] waiter {} queued for {:?}", waiter.id(), waiter.interest());
        }
        Subscription::Pending
    }

    /// Edge-triggered fan-out after a fresh message write.
    ///
    /// Called once per successful offset-0 write. Skips the drain when the
    /// slot is empty (a zero-length fresh write is not length-increasing).
    /// Wakes exactly the readers queued at the instant the guard is held;
    /// the condition stays true for later subscribers via the level check.
    pub fn notify_after_write(&self) {
        let mut slot = self.slot.lock();
        if slot.buffer.message_len() == 0 {
            return;
        }

        let woken = slot.waiters.drain_matching(Interest::Read);
        if !woken.is_empty() {
            log::debug!("[notify] new message woke {} reader(s)", woken.len());
        }
    }

    /// Detach a queued waiter. Returns false with no side effect when the
    /// record was already signaled or already removed.
    pub fn cancel(&self, waiter: &Waiter) -> bool {
        let removed = self.slot.lock().waiters.remove(waiter);
        if removed {
            log::debug!("[notify] waiter {} detached", waiter.id());
        }
        removed
    }
}

impl Default for ReadinessEngine {
    fn default() -> Self {
        Self::new()
    }
}
