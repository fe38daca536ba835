// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command gateway: user intent in, backend requests out.
//!
//! Commands are checked against the tracked status before anything is
//! sent. An accepted pause, resume or cancel leaves the record alone and
//! marks the action pending; the status flips when a sync (or the
//! command's own response) delivers it through the reconciler. A failed
//! command never touches the registry.

use crate::error::CommandError;
use crate::reconcile::{Reconciler, UpdateSource};
use deck_adapters::{CommandTransport, TransportError};
use deck_core::{Action, AgentId, AgentRecord, AgentStatus, Clock, LaunchConfig};
use deck_wire::reason;

#[derive(Clone)]
pub struct CommandGateway<B: CommandTransport, C: Clock> {
    backend: B,
    reconciler: Reconciler<C>,
}

impl<B: CommandTransport, C: Clock> CommandGateway<B, C> {
    pub fn new(backend: B, reconciler: Reconciler<C>) -> Self {
        Self { backend, reconciler }
    }

    /// Launch an agent and track it from the backend's first snapshot
    pub async fn launch(&self, config: LaunchConfig) -> Result<AgentRecord, CommandError> {
        config.validate().map_err(CommandError::LaunchRejected)?;

        let mut snapshot =
            self.backend.launch(&config).await.map_err(CommandError::from_launch)?;
        if snapshot.id.is_empty() {
            return Err(TransportError::Protocol("launch response has no agent id".into()).into());
        }
        snapshot.name = snapshot.name.or_else(|| Some(config.name.clone()));
        snapshot.prompt = snapshot.prompt.or_else(|| Some(config.prompt.clone()));
        snapshot.status = snapshot.status.or(Some(AgentStatus::Queued));

        let id = snapshot.id.clone();
        self.reconciler
            .admit(snapshot, UpdateSource::Command)
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        tracing::info!(%id, name = %config.name, "agent launched");
        self.reconciler.store().get(&id).ok_or(CommandError::NotFound(id))
    }

    pub async fn pause(&self, id: &AgentId) -> Result<(), CommandError> {
        self.act(id, Action::Pause).await
    }

    pub async fn resume(&self, id: &AgentId) -> Result<(), CommandError> {
        self.act(id, Action::Resume).await
    }

    /// Ask the backend to stop the agent. It is not stopped until a
    /// `failed` status arrives.
    pub async fn cancel(&self, id: &AgentId) -> Result<(), CommandError> {
        self.act(id, Action::Cancel).await
    }

    /// Delete a finished agent and stop tracking it
    pub async fn delete(&self, id: &AgentId) -> Result<(), CommandError> {
        let status = self.check(id, Action::Delete)?;
        match self.backend.act(id, Action::Delete).await {
            // Already gone on the backend
            Ok(_) | Err(TransportError::NotFound(_)) => {}
            Err(err) => return Err(CommandError::from_transport(err, id, status, Action::Delete)),
        }
        self.reconciler.store().write(|registry| registry.remove(id));
        self.reconciler.pending().clear(id);
        tracing::info!(%id, "agent deleted");
        Ok(())
    }

    /// Send an operator message to a live agent
    pub async fn intervene(&self, id: &AgentId, message: &str) -> Result<(), CommandError> {
        if message.trim().is_empty() {
            return Err(CommandError::Rejected {
                reason: reason::EMPTY_MESSAGE.to_string(),
                message: "message is empty".to_string(),
            });
        }
        let status = self.check(id, Action::Intervene)?;
        self.backend
            .intervene(id, message)
            .await
            .map_err(|e| CommandError::from_transport(e, id, status, Action::Intervene))?;
        tracing::info!(%id, "message sent");
        Ok(())
    }

    /// Delete every completed agent. Returns the ids removed.
    pub async fn clear_completed(&self) -> Result<Vec<AgentId>, CommandError> {
        self.clear(AgentStatus::Completed).await
    }

    /// Delete every failed agent. Returns the ids removed.
    pub async fn clear_failed(&self) -> Result<Vec<AgentId>, CommandError> {
        self.clear(AgentStatus::Failed).await
    }

    /// Track every agent the backend knows about. Returns how many records
    /// were created or updated.
    pub async fn load_agents(&self) -> Result<usize, CommandError> {
        let snapshots = self.backend.list_agents().await?;
        let mut changed = 0;
        for snapshot in snapshots {
            let id = snapshot.id.clone();
            match self.reconciler.admit(snapshot, UpdateSource::Hydrate) {
                Ok(outcome) if outcome.is_applied() => changed += 1,
                Ok(_) => {}
                Err(e) => tracing::warn!(%id, error = %e, "skipping incomplete snapshot"),
            }
        }
        tracing::debug!(changed, "agents loaded");
        Ok(changed)
    }

    async fn act(&self, id: &AgentId, action: Action) -> Result<(), CommandError> {
        let status = self.check(id, action)?;
        let pending = self.reconciler.pending();
        pending.set(id, action);

        match self.backend.act(id, action).await {
            Ok(Some(snapshot)) if snapshot.id == *id => {
                self.reconciler.apply(snapshot, UpdateSource::Command);
            }
            Ok(_) => {}
            Err(err) => {
                pending.clear_if(id, action);
                tracing::warn!(%id, %action, error = %err, "command failed");
                return Err(CommandError::from_transport(err, id, status, action));
            }
        }
        tracing::info!(%id, %action, "command accepted");
        Ok(())
    }

    /// Current status of `id`, if it permits `action`
    fn check(&self, id: &AgentId, action: Action) -> Result<AgentStatus, CommandError> {
        let status = self
            .reconciler
            .store()
            .read(|registry| registry.get(id).map(|record| record.status))
            .ok_or_else(|| CommandError::NotFound(id.clone()))?;
        if !status.permits(action) {
            return Err(CommandError::InvalidTransition { id: id.clone(), status, action });
        }
        Ok(status)
    }

    async fn clear(&self, status: AgentStatus) -> Result<Vec<AgentId>, CommandError> {
        let ids = self.reconciler.store().read(|registry| registry.ids_with_status(status));
        if ids.is_empty() {
            return Ok(ids);
        }
        self.backend.delete_many(&ids).await?;

        let removed = self.reconciler.store().write(|registry| registry.remove_all(&ids));
        for id in &ids {
            self.reconciler.pending().clear(id);
        }
        tracing::info!(count = removed.len(), %status, "agents cleared");
        Ok(removed.into_iter().map(|record| record.id).collect())
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
