// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Module loader: device lifecycle dispatch.
//!
//! Load registers the device node and allocates the zeroed channel; unload
//! and shutdown destroy both. Any other event code is rejected with
//! `Unsupported` and changes no state.

use std::sync::{Arc, Mutex};

use super::channel::EchoChannel;
use super::registry::{DeviceHandle, DeviceRegistry, Permissions};
use super::{Error, Result};

/// Load event code.
pub const MOD_LOAD: u32 = 0;
/// Unload event code.
pub const MOD_UNLOAD: u32 = 1;
/// Shutdown event code (torn down like unload).
pub const MOD_SHUTDOWN: u32 = 2;

/// Name of the echo device node.
pub const DEVICE_NAME: &str = "echo";

struct LoadedDevice {
    handle: DeviceHandle,
    channel: Arc<EchoChannel>,
}

/// The echo device module: owns the registry entry and the channel between
/// load and unload.
pub struct EchoModule {
    registry: Arc<DeviceRegistry>,
    loaded: Mutex<Option<LoadedDevice>>,
}

impl EchoModule {
    /// Create an unloaded module with its own registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(DeviceRegistry::default()))
    }

    /// Create an unloaded module against a shared registry.
    pub fn with_registry(registry: Arc<DeviceRegistry>) -> Self {
        Self {
            registry,
            loaded: Mutex::new(None),
        }
    }

    /// Dispatch a module event, the loader protocol of the device.
    pub fn dispatch(&self, event: u32) -> Result<()> {
        match event {
            MOD_LOAD => self.load(),
            MOD_UNLOAD | MOD_SHUTDOWN => self.unload(),
            other => Err(Error::Unsupported(other)),
        }
    }

    /// The channel, while loaded. The buffer lives and dies with it.
    pub fn channel(&self) -> Option<Arc<EchoChannel>> {
        self.lock_loaded()
            .as_ref()
            .map(|dev| Arc::clone(&dev.channel))
    }

    pub fn is_loaded(&self) -> bool {
        self.lock_loaded().is_some()
    }

    fn load(&self) -> Result<()> {
        let mut loaded = self.lock_loaded();
        if loaded.is_some() {
            return Err(Error::AlreadyLoaded);
        }

        let handle = self.registry.register(DEVICE_NAME, Permissions::root_rw())?;
        let channel = EchoChannel::new(DEVICE_NAME);
        *loaded = Some(LoadedDevice { handle, channel });

        log::info!("[echo-mod] echo device loaded");
        Ok(())
    }

    fn unload(&self) -> Result<()> {
        let mut loaded = self.lock_loaded();
        let Some(dev) = loaded.take() else {
            return Err(Error::NotLoaded);
        };

        self.registry.unregister(dev.handle);
        drop(dev);

        log::info!("[echo-mod] echo device unloaded");
        Ok(())
    }

    fn lock_loaded(&self) -> std::sync::MutexGuard<'_, Option<LoadedDevice>> {
        match self.loaded.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::debug!("[echo-mod] loaded-state lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for EchoModule {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EchoModule {
    fn drop(&mut self) {
        let _ = self.unload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_unload_cycle() {
        let registry = Arc::new(DeviceRegistry::default());
        let module = EchoModule::with_registry(Arc::clone(&registry));

        module.dispatch(MOD_LOAD).expect("load");
        assert!(module.is_loaded());
        assert!(registry.lookup(DEVICE_NAME).is_some());
        assert!(module.channel().is_some());

        module.dispatch(MOD_UNLOAD).expect("unload");
        assert!(!module.is_loaded());
        assert!(registry.lookup(DEVICE_NAME).is_none());
        assert!(module.channel().is_none());
    }

    #[test]
    fn shutdown_tears_down_like_unload() {
        let module = EchoModule::new();
        module.dispatch(MOD_LOAD).expect("load");
        module.dispatch(MOD_SHUTDOWN).expect("shutdown");
        assert!(!module.is_loaded());
    }

    #[test]
    fn unknown_event_is_unsupported() {
        let module = EchoModule::new();
        match module.dispatch(42) {
            Err(Error::Unsupported(42)) => {}
            other => panic!("expected Unsupported, got {:?}", other),
        }
        assert!(!module.is_loaded());
    }

    #[test]
    fn double_load_and_stray_unload_are_rejected() {
        let module = EchoModule::new();

        match module.dispatch(MOD_UNLOAD) {
            Err(Error::NotLoaded) => {}
            other => panic!("expected NotLoaded, got {:?}", other),
        }

        module.dispatch(MOD_LOAD).expect("load");
        match module.dispatch(MOD_LOAD) {
            Err(Error::AlreadyLoaded) => {}
            other => panic!("expected AlreadyLoaded, got {:?}", other),
        }
    }

    #[test]
    fn reload_starts_with_a_fresh_buffer() {
        let module = EchoModule::new();
        module.dispatch(MOD_LOAD).expect("load");
        module
            .channel()
            .expect("channel")
            .write_bytes(0, b"old")
            .expect("write");

        module.dispatch(MOD_UNLOAD).expect("unload");
        module.dispatch(MOD_LOAD).expect("reload");

        assert_eq!(module.channel().expect("channel").message_len(), 0);
    }
}
