// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Device API
//!
//! The public face of the echo device: the channel entry points
//! (open/close/read/write/subscribe/cancel), the device-node registry, and
//! the module loader that ties their lifecycles together.
//!
//! ## Quick Start
//!
//! ```rust
//! use echodev::{EchoModule, Interest, ParkSignal, Subscription, Waiter, MOD_LOAD};
//!
//! fn main() -> echodev::Result<()> {
//!     let module = EchoModule::new();
//!     module.dispatch(MOD_LOAD)?;
//!
//!     let channel = module.channel().expect("loaded");
//!     channel.open();
//!
//!     // Register for "a message arrived" instead of polling.
//!     let signal = ParkSignal::new();
//!     let waiter = Waiter::new(Interest::Read, signal.clone());
//!     if channel.subscribe(&waiter) == Subscription::Pending {
//!         channel.write_bytes(0, b"hello")?;
//!         assert!(signal.wait_timeout(std::time::Duration::from_secs(1)));
//!     }
//!
//!     let mut out = [0u8; 16];
//!     let n = channel.read_into(0, &mut out)?;
//!     assert_eq!(&out[..n], b"hello\0");
//!
//!     channel.close();
//!     Ok(())
//! }
//! ```

mod channel;
mod module;
mod registry;

pub use channel::EchoChannel;
pub use module::{EchoModule, DEVICE_NAME, MOD_LOAD, MOD_SHUTDOWN, MOD_UNLOAD};
pub use registry::{DeviceHandle, DeviceRegistry, Permissions, REGISTRY_DEFAULT_MAX_NODES};

use crate::core::buffer::BufferError;

/// Errors returned by echo device operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Write-path Errors
    // ========================================================================
    /// Write offset was neither 0 nor the current message length; the buffer
    /// is unmodified.
    InvalidOffset(u64),
    /// The caller-memory transfer faulted. `moved` bytes landed before the
    /// fault and are reflected in the recorded message length.
    IoFault {
        /// Bytes moved before the fault.
        moved: usize,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// Module event code outside {load, unload, shutdown}; no state change.
    Unsupported(u32),
    /// Load dispatched while the device is already loaded.
    AlreadyLoaded,
    /// Unload or channel access dispatched before a successful load.
    NotLoaded,

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// A device node with this name is already registered.
    DeviceExists(String),
    /// The registry node table is full; the only resource-exhaustion path.
    DeviceLimitExceeded(usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Write path
            Error::InvalidOffset(offset) => {
                write!(f, "Invalid write offset: {} (must be 0 or the message length)", offset)
            }
            Error::IoFault { moved } => {
                write!(f, "Transfer faulted against caller memory ({} bytes moved)", moved)
            }
            // Lifecycle
            Error::Unsupported(event) => write!(f, "Unsupported module event: {}", event),
            Error::AlreadyLoaded => write!(f, "Device already loaded"),
            Error::NotLoaded => write!(f, "Device not loaded"),
            // Registry
            Error::DeviceExists(name) => write!(f, "Device node already exists: {}", name),
            Error::DeviceLimitExceeded(max) => {
                write!(f, "Device node limit exceeded (max {})", max)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::InvalidOffset(offset) => Error::InvalidOffset(offset),
            BufferError::Fault(fault) => Error::IoFault { moved: fault.moved },
        }
    }
}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
