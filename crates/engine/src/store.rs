// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handle to the registry plus its change feed.

use deck_core::{AgentId, AgentRecord};
use deck_storage::Registry;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable handle to the one registry.
///
/// Every access runs inside a closure holding the lock, so no caller can
/// hold registry state across an `.await`.
#[derive(Clone)]
pub struct Store {
    registry: Arc<Mutex<Registry>>,
    changes: Arc<watch::Sender<u64>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        let changes = Arc::new(tx);
        let mut registry = Registry::new();
        let feed = Arc::clone(&changes);
        registry.observe(move |change| {
            feed.send_replace(change.version());
        });
        Self { registry: Arc::new(Mutex::new(registry)), changes }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&self.registry.lock())
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        f(&mut self.registry.lock())
    }

    pub fn get(&self, id: &AgentId) -> Option<AgentRecord> {
        self.read(|registry| registry.get(id).cloned())
    }

    /// Registry version after each committed write
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::test_support::record;
    use deck_core::AgentStatus;

    #[test]
    fn change_feed_tracks_registry_version() {
        let store = Store::new();
        let rx = store.changes();
        assert_eq!(*rx.borrow(), 0);

        store.write(|r| r.upsert(record("agt-1", AgentStatus::Queued)));
        store.write(|r| r.upsert(record("agt-2", AgentStatus::Queued)));
        assert_eq!(*rx.borrow(), 2);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn clones_share_one_registry() {
        let store = Store::new();
        let other = store.clone();
        other.write(|r| r.upsert(record("agt-1", AgentStatus::Running)));
        assert_eq!(store.get(&AgentId::new("agt-1")).unwrap().status, AgentStatus::Running);
    }
}
