// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Core Components
//!
//! The slot state machine and the readiness-notification engine that
//! observes it.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `buffer` | Single-slot message store with offset/terminator invariants |
//! | `engine` | Level-triggered check + edge-triggered wake-queue protocol |
//! | `transfer` | Trusted caller-memory copy primitive (interface + slices) |
//! | `waitset` | Waiter records, wait set, wake signals |
//!
//! Most users should use the [`crate::device`] facade instead of driving the
//! engine directly.

/// Single-slot message store.
pub mod buffer;
/// Readiness-notification engine (subscribe / notify protocol).
pub mod engine;
/// Caller-memory transfer primitive.
pub mod transfer;
/// Wait-set registration and wake signals.
pub mod waitset;
