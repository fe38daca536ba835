// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The one surface callers use: read access to tracked agents, commands,
//! subscriptions, logs, and stats.

use crate::config::{ConfigError, SyncConfig};
use crate::error::CommandError;
use crate::gateway::CommandGateway;
use crate::logs::LogStore;
use crate::pending::PendingActions;
use crate::reconcile::{DiagnosticsSnapshot, ReconcileOutcome, Reconciler, UpdateSource};
use crate::stats::StatsAggregator;
use crate::store::Store;
use crate::subscription::{SubscriptionManager, SyncHealth};
use deck_adapters::{Backend, PushTransport};
use deck_core::{
    Action, AgentId, AgentRecord, AgentStats, AgentStatus, AgentUpdate, Clock, LaunchConfig,
    LogEntry,
};
use deck_storage::{Registry, StatusCounts};
use deck_wire::LogQuery;
use tokio::sync::watch;

pub struct Deck<B: Backend, P: PushTransport, C: Clock> {
    store: Store,
    reconciler: Reconciler<C>,
    gateway: CommandGateway<B, C>,
    logs: LogStore<B, C>,
    stats: StatsAggregator<B, C>,
    subscriptions: SubscriptionManager<B, P, C>,
}

impl<B: Backend, P: PushTransport, C: Clock> Deck<B, P, C> {
    pub fn new(backend: B, push: P, clock: C, config: SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = Store::new();
        let pending = PendingActions::new();
        let reconciler =
            Reconciler::new(store.clone(), pending, clock.clone(), config.log_capacity);
        Ok(Self {
            gateway: CommandGateway::new(backend.clone(), reconciler.clone()),
            logs: LogStore::new(backend.clone(), reconciler.clone()),
            stats: StatsAggregator::new(backend.clone(), store.clone(), clock),
            subscriptions: SubscriptionManager::new(backend, push, reconciler.clone(), config),
            store,
            reconciler,
        })
    }

    // -- reads --

    pub fn agent(&self, id: &AgentId) -> Option<AgentRecord> {
        self.store.get(id)
    }

    /// Look up by exact id or unique id prefix
    pub fn find(&self, id_or_prefix: &str) -> Option<AgentRecord> {
        self.store.read(|registry| registry.find(id_or_prefix).cloned())
    }

    /// Every tracked agent, oldest launch first
    pub fn agents(&self) -> Vec<AgentRecord> {
        self.store.read(|registry| registry.all().into_iter().cloned().collect())
    }

    /// Agents in `status`, in the registry's view order
    pub fn agents_with_status(&self, status: AgentStatus) -> Vec<AgentRecord> {
        self.store.read(|registry| registry.with_status(status).into_iter().cloned().collect())
    }

    pub fn counts(&self) -> StatusCounts {
        self.store.read(Registry::counts)
    }

    /// Run `f` against the registry under one consistent view
    pub fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        self.store.read(f)
    }

    /// Registry version, bumped after every committed write
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.store.changes()
    }

    // -- sync state --

    /// Command accepted by the backend but not yet reflected in the record
    pub fn pending(&self, id: &AgentId) -> Option<Action> {
        self.reconciler.pending().get(id)
    }

    pub fn sync_health(&self, id: &AgentId) -> SyncHealth {
        self.subscriptions.health(id)
    }

    pub fn sync_diagnostics(&self) -> DiagnosticsSnapshot {
        self.reconciler.diagnostics()
    }

    // -- commands --

    pub async fn launch_agent(&self, config: LaunchConfig) -> Result<AgentRecord, CommandError> {
        self.gateway.launch(config).await
    }

    pub async fn pause_agent(&self, id: &AgentId) -> Result<(), CommandError> {
        self.gateway.pause(id).await
    }

    pub async fn resume_agent(&self, id: &AgentId) -> Result<(), CommandError> {
        self.gateway.resume(id).await
    }

    pub async fn cancel_agent(&self, id: &AgentId) -> Result<(), CommandError> {
        self.gateway.cancel(id).await
    }

    pub async fn delete_agent(&self, id: &AgentId) -> Result<(), CommandError> {
        self.gateway.delete(id).await?;
        self.subscriptions.unsubscribe(id);
        Ok(())
    }

    pub async fn intervene_agent(&self, id: &AgentId, message: &str) -> Result<(), CommandError> {
        self.gateway.intervene(id, message).await
    }

    pub async fn clear_completed_agents(&self) -> Result<Vec<AgentId>, CommandError> {
        self.gateway.clear_completed().await
    }

    pub async fn clear_failed_agents(&self) -> Result<Vec<AgentId>, CommandError> {
        self.gateway.clear_failed().await
    }

    pub async fn load_agents(&self) -> Result<usize, CommandError> {
        self.gateway.load_agents().await
    }

    // -- subscriptions --

    pub fn subscribe_to_agent(&self, id: &AgentId) -> Result<(), CommandError> {
        self.subscriptions.subscribe(id)
    }

    pub fn unsubscribe_from_agent(&self, id: &AgentId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    // -- logs and stats --

    pub async fn fetch_logs(
        &self,
        id: &AgentId,
        query: LogQuery,
    ) -> Result<Vec<LogEntry>, CommandError> {
        self.logs.fetch_logs(id, query).await
    }

    pub fn append_live(&self, id: &AgentId, entries: Vec<LogEntry>) -> usize {
        self.logs.append_live(id, entries)
    }

    pub fn log_page(&self, id: &AgentId, query: LogQuery) -> Option<Vec<LogEntry>> {
        self.logs.page(id, query)
    }

    pub async fn fetch_stats(&self, window_days: u32) -> Result<AgentStats, CommandError> {
        self.stats.fetch_stats(window_days).await
    }

    pub fn local_stats(&self, window_days: u32) -> AgentStats {
        self.stats.local_stats(window_days)
    }

    /// Feed an update from a source outside the bundled transports
    pub fn apply_update(&self, update: AgentUpdate) -> ReconcileOutcome {
        self.reconciler.apply(update, UpdateSource::Push)
    }
}

#[cfg(test)]
#[path = "deck_tests.rs"]
mod tests;
