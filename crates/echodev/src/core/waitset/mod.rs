// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wait-set registration for readiness notification.
//!
//! A [`Waiter`] is the token representing one pending caller; the [`WaitSet`]
//! holds the queued records and resolves the cancel-versus-wake race. The
//! [`WakeSignal`] trait is the cross-thread wake seam; [`ParkSignal`] is the
//! provided blocking implementation.

mod record;
mod set;
mod signal;

pub use record::{Interest, WaitState, Waiter, WakeSignal};
pub use set::WaitSet;
pub use signal::ParkSignal;

#[cfg(test)]
mod tests;
