// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single gate every agent update passes through.
//!
//! Push deliveries, poll responses, command responses and hydration all
//! land here. Each update is checked for freshness against the current
//! record and merged inside one registry write, so a slower source can
//! never overwrite what a faster one already delivered.

mod diagnostics;
mod merge;

pub use diagnostics::{DiagnosticsSnapshot, SyncDiagnostics};

use crate::pending::PendingActions;
use crate::store::Store;
use deck_core::{
    Action, AgentId, AgentRecord, AgentStatus, AgentUpdate, Clock, LogEntry, SnapshotError,
};
use deck_storage::Registry;
use merge::{freshness, merge, Freshness};
use std::sync::Arc;

/// Where an update came from; used for logging only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Push,
    Poll,
    Command,
    Hydrate,
    LogFetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// No record with this id is tracked
    UnknownAgent,
    /// Carries nothing the record does not already have
    Stale,
    /// Would move the record backwards or out of a terminal state
    InvalidTransition { from: AgentStatus, to: AgentStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied,
    Discarded(DiscardReason),
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Clone)]
pub struct Reconciler<C: Clock> {
    store: Store,
    pending: PendingActions,
    diagnostics: Arc<SyncDiagnostics>,
    clock: C,
    log_capacity: usize,
}

impl<C: Clock> Reconciler<C> {
    pub fn new(store: Store, pending: PendingActions, clock: C, log_capacity: usize) -> Self {
        Self {
            store,
            pending,
            diagnostics: Arc::new(SyncDiagnostics::default()),
            clock,
            log_capacity,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn pending(&self) -> &PendingActions {
        &self.pending
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// Reconcile an update against an already tracked record
    pub fn apply(&self, update: AgentUpdate, source: UpdateSource) -> ReconcileOutcome {
        let id = update.id.clone();
        let now_ms = self.clock.epoch_ms();
        let outcome = self.store.write(|registry| self.reconcile(registry, update, now_ms));
        self.observe(&id, source, outcome);
        outcome
    }

    /// Track a new agent from its snapshot, or reconcile if already tracked
    pub fn admit(
        &self,
        update: AgentUpdate,
        source: UpdateSource,
    ) -> Result<ReconcileOutcome, SnapshotError> {
        let id = update.id.clone();
        let now_ms = self.clock.epoch_ms();
        let outcome = self.store.write(|registry| {
            if registry.contains(&update.id) {
                return Ok(self.reconcile(registry, update, now_ms));
            }
            let record = AgentRecord::from_snapshot(update, self.log_capacity, now_ms)?;
            registry.upsert(record);
            Ok(ReconcileOutcome::Applied)
        })?;
        self.observe(&id, source, outcome);
        Ok(outcome)
    }

    /// Append live log entries, keeping only those after the last known
    /// timestamp. Returns how many were appended.
    pub fn append_logs(&self, id: &AgentId, entries: Vec<LogEntry>) -> usize {
        self.store.write(|registry| {
            let Some(current) = registry.get(id) else {
                return 0;
            };
            if !current.logs.has_newer(&entries) {
                return 0;
            }
            let mut next = current.clone();
            let appended = next.logs.append_after(entries);
            registry.upsert(next);
            appended
        })
    }

    fn reconcile(
        &self,
        registry: &mut Registry,
        update: AgentUpdate,
        now_ms: u64,
    ) -> ReconcileOutcome {
        let Some(current) = registry.get(&update.id) else {
            return ReconcileOutcome::Discarded(DiscardReason::UnknownAgent);
        };
        match freshness(current, &update) {
            Freshness::Stale => ReconcileOutcome::Discarded(DiscardReason::Stale),
            Freshness::Invalid { from, to } => {
                ReconcileOutcome::Discarded(DiscardReason::InvalidTransition { from, to })
            }
            Freshness::Newer => {
                let id = update.id.clone();
                let cancelling = self.pending.get(&id) == Some(Action::Cancel);
                let merged = merge(current, update, now_ms, cancelling);
                let status_changed = merged.status != current.status;
                registry.upsert(merged);
                if status_changed {
                    self.pending.clear(&id);
                }
                ReconcileOutcome::Applied
            }
        }
    }

    fn observe(&self, id: &AgentId, source: UpdateSource, outcome: ReconcileOutcome) {
        self.diagnostics.count(&outcome);
        match outcome {
            ReconcileOutcome::Applied => {
                tracing::debug!(%id, ?source, "update applied");
            }
            ReconcileOutcome::Discarded(DiscardReason::Stale) => {
                tracing::debug!(%id, ?source, "stale update discarded");
            }
            ReconcileOutcome::Discarded(DiscardReason::UnknownAgent) => {
                tracing::debug!(%id, ?source, "update for untracked agent discarded");
            }
            ReconcileOutcome::Discarded(DiscardReason::InvalidTransition { from, to }) => {
                tracing::warn!(%id, ?source, %from, %to, "invalid transition discarded");
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
