// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands accepted by the backend but not yet confirmed by a sync.
//!
//! Kept outside the registry so an unconfirmed command never shows up as
//! agent state.

use deck_core::{Action, AgentId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct PendingActions {
    inner: Arc<Mutex<HashMap<AgentId, Action>>>,
}

impl PendingActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: &AgentId, action: Action) {
        self.inner.lock().insert(id.clone(), action);
    }

    pub fn get(&self, id: &AgentId) -> Option<Action> {
        self.inner.lock().get(id).copied()
    }

    pub fn clear(&self, id: &AgentId) -> Option<Action> {
        self.inner.lock().remove(id)
    }

    /// Clear only if `action` is still the one pending
    pub fn clear_if(&self, id: &AgentId, action: Action) {
        let mut pending = self.inner.lock();
        if pending.get(id) == Some(&action) {
            pending.remove(id);
        }
    }
}
