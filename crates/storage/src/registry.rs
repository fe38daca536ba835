// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed collection of agent records with derived views.
//!
//! The registry is the single owner of every [`AgentRecord`]. Writers go
//! through [`Registry::upsert`], [`Registry::remove`] and
//! [`Registry::remove_all`]; each successful write bumps the version and
//! notifies observers once. Views are recomputed on every call and never
//! cached.

use deck_core::{AgentId, AgentRecord, AgentStatus};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A committed write, delivered to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryChange {
    Upserted { id: AgentId, version: u64 },
    /// One batch, however many ids
    Removed { ids: Vec<AgentId>, version: u64 },
}

impl RegistryChange {
    pub fn version(&self) -> u64 {
        match self {
            Self::Upserted { version, .. } | Self::Removed { version, .. } => *version,
        }
    }
}

type Observer = Box<dyn Fn(&RegistryChange) + Send + Sync>;

/// Number of tracked agents per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub queued: usize,
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.queued + self.running + self.paused + self.completed + self.failed
    }

    pub fn get(&self, status: AgentStatus) -> usize {
        match status {
            AgentStatus::Queued => self.queued,
            AgentStatus::Running => self.running,
            AgentStatus::Paused => self.paused,
            AgentStatus::Completed => self.completed,
            AgentStatus::Failed => self.failed,
        }
    }
}

#[derive(Default)]
pub struct Registry {
    pub(crate) records: HashMap<AgentId, AgentRecord>,
    version: u64,
    observers: Vec<Observer>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("records", &self.records.len())
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback run after every committed write
    pub fn observe(&mut self, observer: impl Fn(&RegistryChange) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Incremented by every committed write
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Insert or replace by id, returning the replaced record
    pub fn upsert(&mut self, record: AgentRecord) -> Option<AgentRecord> {
        let id = record.id.clone();
        let previous = self.records.insert(id.clone(), record);
        tracing::trace!(%id, replaced = previous.is_some(), "registry upsert");
        self.commit(RegistryChange::Upserted { id, version: self.version + 1 });
        previous
    }

    /// Remove one record. Removing an absent id is a no-op and notifies no one.
    pub fn remove(&mut self, id: &AgentId) -> Option<AgentRecord> {
        let removed = self.records.remove(id)?;
        self.commit(RegistryChange::Removed { ids: vec![id.clone()], version: self.version + 1 });
        Some(removed)
    }

    /// Remove every listed record as one batch with a single notification
    pub fn remove_all(&mut self, ids: &[AgentId]) -> Vec<AgentRecord> {
        let removed: Vec<AgentRecord> =
            ids.iter().filter_map(|id| self.records.remove(id)).collect();
        if !removed.is_empty() {
            let ids = removed.iter().map(|r| r.id.clone()).collect();
            self.commit(RegistryChange::Removed { ids, version: self.version + 1 });
        }
        removed
    }

    fn commit(&mut self, change: RegistryChange) {
        self.version = change.version();
        for observer in &self.observers {
            observer(&change);
        }
    }

    pub fn get(&self, id: &AgentId) -> Option<&AgentRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.records.contains_key(id)
    }

    /// Look up by exact id, else by unique id prefix (like git commit hashes)
    pub fn find(&self, id_or_prefix: &str) -> Option<&AgentRecord> {
        if let Some(record) = self.records.get(id_or_prefix) {
            return Some(record);
        }
        let mut matches =
            self.records.values().filter(|r| r.id.as_str().starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Some(record),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> + '_ {
        self.records.values()
    }

    /// Every record, oldest launch first
    pub fn all(&self) -> Vec<&AgentRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| {
            a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    /// Records in `status`.
    ///
    /// Terminal states are ordered most recently started first; live states
    /// by launch time, oldest first.
    pub fn with_status(&self, status: AgentStatus) -> Vec<&AgentRecord> {
        let mut records: Vec<_> = self.records.values().filter(|r| r.status == status).collect();
        if status.is_terminal() {
            records.sort_by(|a, b| {
                let started = |r: &AgentRecord| r.started_at_ms.unwrap_or(r.created_at_ms);
                started(b).cmp(&started(a)).then_with(|| a.id.cmp(&b.id))
            });
        } else {
            records.sort_by(|a, b| {
                a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id))
            });
        }
        records
    }

    pub fn ids_with_status(&self, status: AgentStatus) -> Vec<AgentId> {
        self.with_status(status).into_iter().map(|r| r.id.clone()).collect()
    }

    pub fn running(&self) -> Vec<&AgentRecord> {
        self.with_status(AgentStatus::Running)
    }

    pub fn queued(&self) -> Vec<&AgentRecord> {
        self.with_status(AgentStatus::Queued)
    }

    pub fn paused(&self) -> Vec<&AgentRecord> {
        self.with_status(AgentStatus::Paused)
    }

    pub fn completed(&self) -> Vec<&AgentRecord> {
        self.with_status(AgentStatus::Completed)
    }

    pub fn failed(&self) -> Vec<&AgentRecord> {
        self.with_status(AgentStatus::Failed)
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in self.records.values() {
            match record.status {
                AgentStatus::Queued => counts.queued += 1,
                AgentStatus::Running => counts.running += 1,
                AgentStatus::Paused => counts.paused += 1,
                AgentStatus::Completed => counts.completed += 1,
                AgentStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
