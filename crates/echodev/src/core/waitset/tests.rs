// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::unwrap_used)] // test scaffolding

use super::{Interest, ParkSignal, WaitSet, WaitState, Waiter, WakeSignal};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Signal that counts wake deliveries.
struct CountSignal(AtomicUsize);

impl CountSignal {
    fn new() -> Arc<Self> {
        Arc::new(Self(AtomicUsize::new(0)))
    }

    fn count(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

impl WakeSignal for CountSignal {
    fn wake(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

#[test]
fn insert_is_at_most_once() {
    let mut set = WaitSet::new();
    let waiter = Waiter::new(Interest::Read, CountSignal::new());

    assert!(set.insert(Arc::clone(&waiter)));
    assert!(!set.insert(Arc::clone(&waiter)));
    assert_eq!(set.len(), 1);
}

#[test]
fn drain_signals_each_record_once() {
    let mut set = WaitSet::new();
    let signal_a = CountSignal::new();
    let signal_b = CountSignal::new();
    let a = Waiter::new(Interest::Read, Arc::clone(&signal_a) as Arc<dyn WakeSignal>);
    let b = Waiter::new(Interest::Read, Arc::clone(&signal_b) as Arc<dyn WakeSignal>);

    set.insert(Arc::clone(&a));
    set.insert(Arc::clone(&b));

    let drained = set.drain_matching(Interest::Read);
    assert_eq!(drained.len(), 2);
    assert!(set.is_empty());
    assert_eq!(a.state(), WaitState::Signaled);
    assert_eq!(b.state(), WaitState::Signaled);
    assert_eq!(signal_a.count(), 1);
    assert_eq!(signal_b.count(), 1);

    // A second drain finds nothing and fires nothing.
    assert!(set.drain_matching(Interest::Read).is_empty());
    assert_eq!(signal_a.count(), 1);
}

#[test]
fn drain_only_touches_matching_interest() {
    let mut set = WaitSet::new();
    let reader = Waiter::new(Interest::Read, CountSignal::new());
    let writer = Waiter::new(Interest::Write, CountSignal::new());

    set.insert(Arc::clone(&reader));
    set.insert(Arc::clone(&writer));

    let drained = set.drain_matching(Interest::Read);
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].id(), reader.id());
    assert_eq!(set.len(), 1);
    assert_eq!(writer.state(), WaitState::Pending);
}

#[test]
fn remove_detaches_and_is_idempotent() {
    let mut set = WaitSet::new();
    let signal = CountSignal::new();
    let waiter = Waiter::new(Interest::Read, Arc::clone(&signal) as Arc<dyn WakeSignal>);

    set.insert(Arc::clone(&waiter));
    assert!(set.remove(&waiter));
    assert_eq!(waiter.state(), WaitState::Detached);
    assert_eq!(signal.count(), 0);

    // Already gone: no side effect.
    assert!(!set.remove(&waiter));
}

#[test]
fn remove_after_drain_returns_false() {
    let mut set = WaitSet::new();
    let waiter = Waiter::new(Interest::Read, CountSignal::new());

    set.insert(Arc::clone(&waiter));
    set.drain_matching(Interest::Read);

    assert!(!set.remove(&waiter));
    assert_eq!(waiter.state(), WaitState::Signaled);
}

#[test]
fn terminal_records_are_never_reinserted() {
    let mut set = WaitSet::new();
    let waiter = Waiter::new(Interest::Read, CountSignal::new());

    set.insert(Arc::clone(&waiter));
    set.drain_matching(Interest::Read);

    assert!(!set.insert(Arc::clone(&waiter)));
    assert!(set.is_empty());
}

#[test]
fn park_signal_delivers_before_and_after_wait() {
    let signal = ParkSignal::new();

    // Wake before wait is not lost.
    signal.wake();
    assert!(signal.wait_timeout(Duration::from_millis(10)));

    // Consumed: the next wait times out.
    assert!(!signal.wait_timeout(Duration::from_millis(10)));

    // Wake from another thread lands.
    let remote = Arc::clone(&signal);
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        remote.wake();
    });
    assert!(signal.wait_timeout(Duration::from_secs(2)));
    handle.join().unwrap();
}

#[test]
fn park_signal_take_is_nonblocking() {
    let signal = ParkSignal::new();
    assert!(!signal.take());
    signal.wake();
    assert!(signal.take());
    assert!(!signal.take());
}
