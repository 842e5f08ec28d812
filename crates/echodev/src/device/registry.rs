// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Device-node registry.
//!
//! Pure configuration, off the per-call hot path: names a device node with
//! its permissions at load time and forgets it at unload. Handles carry a
//! generation id so a stale handle can never free a reused slot.

use std::sync::Mutex;

use super::{Error, Result};

/// Default maximum number of device nodes per registry.
pub const REGISTRY_DEFAULT_MAX_NODES: usize = 64;

/// Ownership and mode bits for a device node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub uid: u32,
    pub gid: u32,
    /// Octal access mode, e.g. `0o600`.
    pub mode: u32,
}

impl Permissions {
    pub const fn new(uid: u32, gid: u32, mode: u32) -> Self {
        Self { uid, gid, mode }
    }

    /// Root-owned, owner read/write only.
    pub const fn root_rw() -> Self {
        Self::new(0, 0, 0o600)
    }
}

/// Handle for a registered device node (stable across slot reuse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceHandle {
    index: usize,
    id: u64,
}

struct DeviceNode {
    id: u64,
    name: String,
    perms: Permissions,
}

struct NodeTable {
    entries: Vec<Option<DeviceNode>>,
    free: Vec<usize>,
    next_id: u64,
}

impl NodeTable {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            next_id: 1,
        }
    }
}

/// Registry of named device nodes.
pub struct DeviceRegistry {
    nodes: Mutex<NodeTable>,
    max_nodes: usize,
}

impl DeviceRegistry {
    /// Create a registry tracking up to `max_nodes` nodes.
    pub fn new(max_nodes: usize) -> Self {
        Self {
            nodes: Mutex::new(NodeTable::new()),
            max_nodes,
        }
    }

    /// Register a device node. Fails when the name is taken or the table is
    /// full; the latter is the only resource-exhaustion path in the device.
    pub fn register(&self, name: &str, perms: Permissions) -> Result<DeviceHandle> {
        let mut table = self.lock_table();

        if table
            .entries
            .iter()
            .flatten()
            .any(|node| node.name == name)
        {
            return Err(Error::DeviceExists(name.to_string()));
        }

        let index = if let Some(index) = table.free.pop() {
            index
        } else {
            let index = table.entries.len();
            if index >= self.max_nodes {
                return Err(Error::DeviceLimitExceeded(self.max_nodes));
            }
            table.entries.push(None);
            index
        };

        let id = table.next_id;
        table.next_id = table.next_id.wrapping_add(1).max(1);
        table.entries[index] = Some(DeviceNode {
            id,
            name: name.to_string(),
            perms,
        });

        log::info!(
            "[registry] registered node \"{}\" uid={} gid={} mode={:o}",
            name,
            perms.uid,
            perms.gid,
            perms.mode
        );
        Ok(DeviceHandle { index, id })
    }

    /// Unregister a node. Returns true if the handle named a live node;
    /// stale handles (slot reused) are rejected via the generation id.
    pub fn unregister(&self, handle: DeviceHandle) -> bool {
        let mut table = self.lock_table();

        match table.entries.get(handle.index) {
            Some(Some(node)) if node.id == handle.id => {
                let name = node.name.clone();
                table.entries[handle.index] = None;
                table.free.push(handle.index);
                log::info!("[registry] unregistered node \"{}\"", name);
                true
            }
            _ => false,
        }
    }

    /// Look up a node by name.
    pub fn lookup(&self, name: &str) -> Option<DeviceHandle> {
        let table = self.lock_table();
        table
            .entries
            .iter()
            .enumerate()
            .find_map(|(index, entry)| match entry {
                Some(node) if node.name == name => Some(DeviceHandle {
                    index,
                    id: node.id,
                }),
                _ => None,
            })
    }

    /// Permissions recorded for a live handle.
    pub fn permissions(&self, handle: DeviceHandle) -> Option<Permissions> {
        let table = self.lock_table();
        match table.entries.get(handle.index) {
            Some(Some(node)) if node.id == handle.id => Some(node.perms),
            _ => None,
        }
    }

    fn lock_table(&self) -> std::sync::MutexGuard<'_, NodeTable> {
        match self.nodes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::debug!("[registry] node table poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new(REGISTRY_DEFAULT_MAX_NODES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_lookup_unregister() {
        let registry = DeviceRegistry::default();
        let handle = registry
            .register("echo", Permissions::root_rw())
            .expect("register");

        assert_eq!(registry.lookup("echo"), Some(handle));
        assert_eq!(registry.permissions(handle), Some(Permissions::root_rw()));

        assert!(registry.unregister(handle));
        assert_eq!(registry.lookup("echo"), None);
        assert!(!registry.unregister(handle));
    }

    #[test]
    fn duplicate_name_rejected() {
        let registry = DeviceRegistry::default();
        registry
            .register("echo", Permissions::root_rw())
            .expect("first");

        match registry.register("echo", Permissions::root_rw()) {
            Err(Error::DeviceExists(name)) => assert_eq!(name, "echo"),
            other => panic!("expected DeviceExists, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn stale_handle_cannot_free_reused_slot() {
        let registry = DeviceRegistry::default();
        let stale = registry
            .register("first", Permissions::root_rw())
            .expect("register");
        assert!(registry.unregister(stale));

        // Slot is reused with a new generation id.
        let fresh = registry
            .register("second", Permissions::root_rw())
            .expect("register");

        assert!(!registry.unregister(stale));
        assert_eq!(registry.lookup("second"), Some(fresh));
    }

    #[test]
    fn table_capacity_is_enforced() {
        let registry = DeviceRegistry::new(2);
        registry.register("a", Permissions::root_rw()).expect("a");
        registry.register("b", Permissions::root_rw()).expect("b");

        match registry.register("c", Permissions::root_rw()) {
            Err(Error::DeviceLimitExceeded(2)) => {}
            other => panic!("expected DeviceLimitExceeded, got {:?}", other.map(|_| ())),
        }
    }
}
