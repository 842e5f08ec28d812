// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Channel facade: the device entry points.
//!
//! One channel per device node, shared by every opener. The buffer is global
//! to the channel, not per open handle, and persists across open/close
//! cycles; only module unload frees it. Reads never block; readiness is
//! surfaced exclusively through the subscribe path.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::Result;
use crate::core::engine::{ReadinessEngine, Subscription};
use crate::core::transfer::{SliceSink, SliceSource, UserSink, UserSource};
use crate::core::waitset::Waiter;

/// The echo channel: open/close/read/write/subscribe/cancel.
pub struct EchoChannel {
    name: String,
    engine: Arc<ReadinessEngine>,
    opens: AtomicU32,
}

impl EchoChannel {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            engine: Arc::new(ReadinessEngine::new()),
            opens: AtomicU32::new(0),
        })
    }

    /// Device node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open the channel. Always succeeds; open is reference-counted and the
    /// channel is shared by all openers.
    pub fn open(&self) {
        let handles = self.opens.fetch_add(1, Ordering::AcqRel) + 1;
        log::info!(
            "[echo-chan] opened device \"{}\" successfully ({} open)",
            self.name,
            handles
        );
    }

    /// Close one open handle. Always succeeds; the buffer is not freed.
    pub fn close(&self) {
        let _ = self
            .opens
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        log::info!("[echo-chan] closing device \"{}\"", self.name);
    }

    /// Current number of open handles.
    pub fn open_count(&self) -> u32 {
        self.opens.load(Ordering::Acquire)
    }

    /// Length of the stored message.
    pub fn message_len(&self) -> usize {
        self.engine.message_len()
    }

    /// Read up to `max` bytes of the message (terminator included) starting
    /// at `offset` into `sink`. Never blocks and never consults the wait
    /// path; a read past the message moves zero bytes.
    pub fn read(&self, offset: u64, sink: &mut dyn UserSink, max: usize) -> Result<usize> {
        let n = self.engine.read_at(offset, sink, max)?;
        Ok(n)
    }

    /// Write up to `resid` bytes from `source` at `offset`. A successful
    /// write starting at offset 0 is a fresh message and wakes every queued
    /// reader.
    pub fn write(&self, offset: u64, source: &mut dyn UserSource, resid: usize) -> Result<usize> {
        let n = self.engine.write_at(offset, source, resid)?;
        if offset == 0 {
            self.engine.notify_after_write();
        }
        Ok(n)
    }

    /// Slice convenience over [`EchoChannel::write`].
    pub fn write_bytes(&self, offset: u64, bytes: &[u8]) -> Result<usize> {
        let mut source = SliceSource::new(bytes);
        self.write(offset, &mut source, bytes.len())
    }

    /// Slice convenience over [`EchoChannel::read`].
    pub fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let max = buf.len();
        let mut sink = SliceSink::new(buf);
        self.read(offset, &mut sink, max)
    }

    /// Register `waiter` for its readiness condition: `Ready` when the
    /// condition already holds, `Pending` once queued for a wake.
    pub fn subscribe(&self, waiter: &Arc<Waiter>) -> Subscription {
        self.engine.check_and_maybe_subscribe(waiter)
    }

    /// Cancel a pending subscription. Idempotent; returns false when the
    /// waiter was already woken or already removed.
    pub fn cancel(&self, waiter: &Waiter) -> bool {
        let detached = self.engine.cancel(waiter);
        if detached {
            log::debug!("[echo-chan] filter gone (waiter {})", waiter.id());
        }
        detached
    }
}
