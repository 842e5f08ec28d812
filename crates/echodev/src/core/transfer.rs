// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Caller-memory transfer primitive.
//!
//! The slot engine never touches caller memory directly. Every read and write
//! goes through exactly one transfer call against these traits, which model
//! the trusted "copy n bytes, report how many, fault on bad caller memory"
//! primitive. A fault reports how many bytes landed before it so the buffer
//! can commit its length first.

/// Fault raised by a transfer against caller memory.
///
/// `moved` is the number of bytes that were copied before the fault. The slot
/// records this count in its length even though the operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemFault {
    /// Bytes moved before the fault.
    pub moved: usize,
}

/// Caller-memory source for write-style transfers (caller -> slot).
pub trait UserSource {
    /// Move up to `dst.len()` bytes from caller memory into `dst`.
    ///
    /// Returns the number of bytes moved, which is never greater than
    /// `dst.len()`. Implementations are trusted to uphold that bound.
    fn copy_in(&mut self, dst: &mut [u8]) -> Result<usize, MemFault>;
}

/// Caller-memory sink for read-style transfers (slot -> caller).
pub trait UserSink {
    /// Move up to `src.len()` bytes from `src` out to caller memory.
    ///
    /// Returns the number of bytes moved, never greater than `src.len()`.
    fn copy_out(&mut self, src: &[u8]) -> Result<usize, MemFault>;
}

/// In-process [`UserSource`] backed by a borrowed byte slice.
///
/// Consumes from the front on every `copy_in`, so one source can feed a
/// multi-call write sequence the way a residual-counting I/O vector would.
pub struct SliceSource<'a> {
    rest: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }
}

impl UserSource for SliceSource<'_> {
    fn copy_in(&mut self, dst: &mut [u8]) -> Result<usize, MemFault> {
        let n = dst.len().min(self.rest.len());
        dst[..n].copy_from_slice(&self.rest[..n]);
        self.rest = &self.rest[n..];
        Ok(n)
    }
}

/// In-process [`UserSink`] backed by a borrowed mutable byte slice.
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    filled: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, filled: 0 }
    }

    /// Bytes written into the sink so far.
    pub fn filled(&self) -> usize {
        self.filled
    }
}

impl UserSink for SliceSink<'_> {
    fn copy_out(&mut self, src: &[u8]) -> Result<usize, MemFault> {
        let space = self.buf.len() - self.filled;
        let n = src.len().min(space);
        self.buf[self.filled..self.filled + n].copy_from_slice(&src[..n]);
        self.filled += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_consumes_from_front() {
        let mut source = SliceSource::new(b"hello");
        let mut dst = [0u8; 3];

        assert_eq!(source.copy_in(&mut dst), Ok(3));
        assert_eq!(&dst, b"hel");
        assert_eq!(source.remaining(), 2);

        let mut dst = [0u8; 8];
        assert_eq!(source.copy_in(&mut dst), Ok(2));
        assert_eq!(&dst[..2], b"lo");
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn slice_sink_tracks_fill() {
        let mut buf = [0u8; 4];
        let mut sink = SliceSink::new(&mut buf);

        assert_eq!(sink.copy_out(b"ab"), Ok(2));
        assert_eq!(sink.copy_out(b"cdef"), Ok(2));
        assert_eq!(sink.filled(), 4);
        assert_eq!(&buf, b"abcd");
    }

    #[test]
    fn empty_transfers_move_nothing() {
        let mut source = SliceSource::new(b"");
        let mut dst = [0u8; 4];
        assert_eq!(source.copy_in(&mut dst), Ok(0));

        let mut buf = [0u8; 4];
        let mut sink = SliceSink::new(&mut buf);
        assert_eq!(sink.copy_out(&[]), Ok(0));
    }
}
