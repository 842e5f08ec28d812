// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # echodev - single-slot message device with readiness notification
//!
//! An in-process re-expression of a classic echo pseudo-device: one writer
//! streams a short message into a bounded single-slot buffer, any number of
//! readers read it back, and readers may register for asynchronous
//! notification when a new message arrives instead of polling.
//!
//! ## Quick Start
//!
//! ```rust
//! use echodev::{EchoModule, Result, MOD_LOAD, MOD_UNLOAD};
//!
//! fn main() -> Result<()> {
//!     let module = EchoModule::new();
//!     module.dispatch(MOD_LOAD)?;
//!
//!     let channel = module.channel().expect("loaded");
//!     channel.open();
//!     channel.write_bytes(0, b"hello")?;
//!
//!     let mut out = [0u8; 16];
//!     let n = channel.read_into(0, &mut out)?;
//!     assert_eq!(&out[..n], b"hello\0"); // reads expose the terminator
//!
//!     channel.close();
//!     module.dispatch(MOD_UNLOAD)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------------+
//! |                      Device Layer                         |
//! |   EchoModule -> DeviceRegistry, EchoChannel (facade)      |
//! +-----------------------------------------------------------+
//! |                       Core Layer                          |
//! |   ReadinessEngine: one guard over                         |
//! |     MessageBuffer (slot)  +  WaitSet (queued waiters)     |
//! +-----------------------------------------------------------+
//! |                     Caller Signals                        |
//! |   WakeSignal trait, ParkSignal (mutex + condvar)          |
//! +-----------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EchoModule`] | Loader: registers the node, owns the channel |
//! | [`EchoChannel`] | Entry points: open/close/read/write/subscribe/cancel |
//! | [`Waiter`] | Registration token for one pending caller |
//! | [`ParkSignal`] | Blocking wake signal for callers that park |
//! | [`ReadinessEngine`] | Level-triggered check + edge-triggered wake queue |
//!
//! ## Readiness model
//!
//! `subscribe` never blocks. It evaluates the condition under the slot guard
//! and either answers `Ready` (level-triggered fast path) or queues the
//! waiter. Every fresh message write drains the queued readers and fires
//! each wake exactly once (edge-triggered fan-out). A caller that wants to
//! block parks on its own [`ParkSignal`]; a caller that gives up cancels,
//! and a cancel racing a wake resolves to exactly one winner.

/// Slot state machine and readiness-notification engine.
pub mod core;
/// Device facade: channel, registry, module loader, error taxonomy.
pub mod device;

pub use crate::core::buffer::{BufferError, MessageBuffer, MESSAGE_CAPACITY};
pub use crate::core::engine::{ReadinessEngine, Subscription};
pub use crate::core::transfer::{MemFault, SliceSink, SliceSource, UserSink, UserSource};
pub use crate::core::waitset::{Interest, ParkSignal, WaitSet, WaitState, Waiter, WakeSignal};
pub use crate::device::{
    DeviceHandle, DeviceRegistry, EchoChannel, EchoModule, Error, Permissions, Result,
    DEVICE_NAME, MOD_LOAD, MOD_SHUTDOWN, MOD_UNLOAD, REGISTRY_DEFAULT_MAX_NODES,
};
