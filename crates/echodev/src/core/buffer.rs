// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-slot message buffer.
//!
//! Holds exactly one message of up to [`MESSAGE_CAPACITY`] bytes plus a
//! reserved terminator slot. Writes must start a fresh message (offset 0,
//! which resets the length) or continue the current one (offset == length);
//! random-access overwrite is rejected. Reads expose one byte past the
//! recorded length so callers always see the terminator.
//!
//! The buffer is a pure state machine: it performs no locking and never
//! blocks. [`crate::core::engine::ReadinessEngine`] owns the guard.

use super::transfer::{MemFault, UserSink, UserSource};

/// Maximum message length in bytes. One extra slot is reserved so the
/// terminator can be written even when a message fills the full capacity.
pub const MESSAGE_CAPACITY: usize = 255;

/// Errors surfaced by buffer operations.
#[derive(Debug, PartialEq, Eq)]
pub enum BufferError {
    /// Write offset was neither 0 nor the current message length.
    InvalidOffset(u64),
    /// Transfer against caller memory faulted. The buffer length was already
    /// committed to reflect the bytes that did move.
    Fault(MemFault),
}

/// The single-slot message store.
pub struct MessageBuffer {
    data: [u8; MESSAGE_CAPACITY + 1],
    len: usize,
}

impl MessageBuffer {
    /// Create a zeroed, empty buffer.
    pub fn new() -> Self {
        Self {
            data: [0u8; MESSAGE_CAPACITY + 1],
            len: 0,
        }
    }

    /// Length of the current message, terminator excluded.
    pub fn message_len(&self) -> usize {
        self.len
    }

    /// The current message bytes, terminator excluded.
    pub fn message(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Write a message fragment at `offset`, pulling up to `resid` bytes from
    /// `source`.
    ///
    /// Only offset 0 (fresh message, resets the length) or offset == current
    /// length (continuation) are accepted. The transfer is capped at the
    /// remaining capacity; excess input is silently truncated. The length is
    /// committed and the terminator written before any transfer fault is
    /// propagated, so a faulted write still records the bytes that landed.
    pub fn write_at(
        &mut self,
        offset: u64,
        source: &mut dyn UserSource,
        resid: usize,
    ) -> Result<usize, BufferError> {
        // Either start from the beginning or append; no random access.
        if offset != 0 && offset != self.len as u64 {
            return Err(BufferError::InvalidOffset(offset));
        }

        // A new message resets the length.
        if offset == 0 {
            self.len = 0;
        }

        let off = offset as usize;
        let amt = resid.min(MESSAGE_CAPACITY - self.len);
        let result = source.copy_in(&mut self.data[off..off + amt]);

        // Record the length and terminate before surfacing any fault.
        let moved = match &result {
            Ok(n) => *n,
            Err(fault) => fault.moved,
        };
        self.len = off + moved;
        self.data[self.len] = 0;

        result.map_err(BufferError::Fault)
    }

    /// Read up to `max` bytes starting at `offset` into `sink`.
    ///
    /// A read starting at or past `length + 1` moves zero bytes (end of
    /// message, not an error). The window extends one byte past the recorded
    /// length so the terminator is delivered to the caller.
    pub fn read_at(
        &self,
        offset: u64,
        sink: &mut dyn UserSink,
        max: usize,
    ) -> Result<usize, BufferError> {
        let window = self.len as u64 + 1;
        let src: &[u8] = if offset >= window {
            &[]
        } else {
            let off = offset as usize;
            let amt = max.min((window - offset) as usize);
            &self.data[off..off + amt]
        };

        sink.copy_out(src).map_err(BufferError::Fault)
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}
