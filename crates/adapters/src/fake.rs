// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory backend for tests.
//!
//! Implements every transport trait, records each call, and lets a test
//! script poll responses, push deliveries, disconnects and failures.

use crate::transport::{
    CommandTransport, PollTransport, PushTransport, StatsTransport, TransportError,
};
use async_trait::async_trait;
use deck_core::{
    Action, AgentId, AgentStats, AgentStatus, AgentUpdate, LaunchConfig, LogBuffer, LogEntry,
};
use deck_wire::LogQuery;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Launch(LaunchConfig),
    Act { id: AgentId, action: Action },
    Intervene { id: AgentId, message: String },
    DeleteMany(Vec<AgentId>),
    ListAgents,
    FetchAgent(AgentId),
    FetchLogs { id: AgentId, query: LogQuery },
    FetchStats(u32),
    Subscribe(AgentId),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<TransportCall>,
    launched: u64,
    snapshots: HashMap<AgentId, AgentUpdate>,
    poll_queue: HashMap<AgentId, VecDeque<Result<AgentUpdate, TransportError>>>,
    failing_polls: bool,
    action_responses: HashMap<AgentId, AgentUpdate>,
    logs: HashMap<AgentId, Vec<LogEntry>>,
    stats: AgentStats,
    push_senders: HashMap<AgentId, mpsc::Sender<AgentUpdate>>,
    push_unavailable: bool,
    next_error: Option<TransportError>,
}

/// Fake backend and push transport
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }

    /// Calls other than polls and subscriptions
    pub fn command_calls(&self) -> Vec<TransportCall> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    TransportCall::FetchAgent(_)
                        | TransportCall::FetchLogs { .. }
                        | TransportCall::Subscribe(_)
                )
            })
            .collect()
    }

    pub fn poll_count(&self, id: &AgentId) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, TransportCall::FetchAgent(i) if i == id))
            .count()
    }

    pub fn subscribe_count(&self, id: &AgentId) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Subscribe(i) if i == id))
            .count()
    }

    /// Snapshot served by polls and listings once the poll queue is empty
    pub fn set_snapshot(&self, update: AgentUpdate) {
        self.inner.lock().snapshots.insert(update.id.clone(), update);
    }

    /// Serve `response` to the next poll of its agent, ahead of the snapshot
    pub fn queue_poll(&self, id: &AgentId, response: Result<AgentUpdate, TransportError>) {
        self.inner.lock().poll_queue.entry(id.clone()).or_default().push_back(response);
    }

    /// Make every poll fail with a connection error until turned off
    pub fn fail_polls(&self, failing: bool) {
        self.inner.lock().failing_polls = failing;
    }

    /// Answer the next pause/resume/cancel of `update.id` with `update`
    pub fn respond_to_action(&self, update: AgentUpdate) {
        self.inner.lock().action_responses.insert(update.id.clone(), update);
    }

    pub fn set_logs(&self, id: &AgentId, logs: Vec<LogEntry>) {
        self.inner.lock().logs.insert(id.clone(), logs);
    }

    pub fn set_stats(&self, stats: AgentStats) {
        self.inner.lock().stats = stats;
    }

    /// Fail the next command, launch, listing or stats call with `err`
    pub fn fail_next(&self, err: TransportError) {
        self.inner.lock().next_error = Some(err);
    }

    /// Make new push subscriptions fail
    pub fn set_push_unavailable(&self, unavailable: bool) {
        self.inner.lock().push_unavailable = unavailable;
    }

    /// Deliver `update` over the agent's push stream; false if none is open
    pub fn push(&self, update: AgentUpdate) -> bool {
        let sender = self.inner.lock().push_senders.get(&update.id).cloned();
        match sender {
            Some(tx) => tx.try_send(update).is_ok(),
            None => false,
        }
    }

    /// Drop the agent's push stream, as if the connection fell over
    pub fn disconnect(&self, id: &AgentId) {
        self.inner.lock().push_senders.remove(id);
    }

    pub fn is_push_open(&self, id: &AgentId) -> bool {
        self.inner.lock().push_senders.get(id).is_some_and(|tx| !tx.is_closed())
    }

    fn take_error(&self) -> Result<(), TransportError> {
        match self.inner.lock().next_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn record(&self, call: TransportCall) {
        self.inner.lock().calls.push(call);
    }
}

#[async_trait]
impl CommandTransport for FakeTransport {
    async fn launch(&self, config: &LaunchConfig) -> Result<AgentUpdate, TransportError> {
        self.record(TransportCall::Launch(config.clone()));
        self.take_error()?;
        let mut state = self.inner.lock();
        state.launched += 1;
        let update = AgentUpdate::new(format!("agt-{}", state.launched))
            .name(config.name.clone())
            .prompt(config.prompt.clone())
            .status(AgentStatus::Queued)
            .progress(0u8)
            .revision(1u64);
        state.snapshots.insert(update.id.clone(), update.clone());
        Ok(update)
    }

    async fn act(
        &self,
        id: &AgentId,
        action: Action,
    ) -> Result<Option<AgentUpdate>, TransportError> {
        self.record(TransportCall::Act { id: id.clone(), action });
        self.take_error()?;
        let mut state = self.inner.lock();
        if action == Action::Delete {
            state.snapshots.remove(id);
            return Ok(None);
        }
        Ok(state.action_responses.remove(id))
    }

    async fn intervene(&self, id: &AgentId, message: &str) -> Result<(), TransportError> {
        self.record(TransportCall::Intervene { id: id.clone(), message: message.to_string() });
        self.take_error()
    }

    async fn delete_many(&self, ids: &[AgentId]) -> Result<(), TransportError> {
        self.record(TransportCall::DeleteMany(ids.to_vec()));
        self.take_error()?;
        let mut state = self.inner.lock();
        for id in ids {
            state.snapshots.remove(id);
        }
        Ok(())
    }

    async fn list_agents(&self) -> Result<Vec<AgentUpdate>, TransportError> {
        self.record(TransportCall::ListAgents);
        self.take_error()?;
        let mut agents: Vec<_> = self.inner.lock().snapshots.values().cloned().collect();
        agents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(agents)
    }
}

#[async_trait]
impl PollTransport for FakeTransport {
    async fn fetch_agent(&self, id: &AgentId) -> Result<AgentUpdate, TransportError> {
        self.record(TransportCall::FetchAgent(id.clone()));
        let mut state = self.inner.lock();
        if let Some(response) = state.poll_queue.get_mut(id).and_then(VecDeque::pop_front) {
            return response;
        }
        if state.failing_polls {
            return Err(TransportError::Connection("poll refused".into()));
        }
        state.snapshots.get(id).cloned().ok_or_else(|| TransportError::NotFound(id.to_string()))
    }

    async fn fetch_logs(
        &self,
        id: &AgentId,
        query: LogQuery,
    ) -> Result<Vec<LogEntry>, TransportError> {
        self.record(TransportCall::FetchLogs { id: id.clone(), query });
        let state = self.inner.lock();
        let Some(logs) = state.logs.get(id) else {
            return Err(TransportError::NotFound(id.to_string()));
        };
        let mut buffer = LogBuffer::new(0);
        buffer.append_after(logs.iter().cloned());
        Ok(buffer.page(query.limit, query.before))
    }
}

#[async_trait]
impl StatsTransport for FakeTransport {
    async fn fetch_stats(&self, window_days: u32) -> Result<AgentStats, TransportError> {
        self.record(TransportCall::FetchStats(window_days));
        self.take_error()?;
        Ok(self.inner.lock().stats.clone())
    }
}

#[async_trait]
impl PushTransport for FakeTransport {
    async fn subscribe(&self, id: &AgentId) -> Result<mpsc::Receiver<AgentUpdate>, TransportError> {
        self.record(TransportCall::Subscribe(id.clone()));
        let mut state = self.inner.lock();
        if state.push_unavailable {
            return Err(TransportError::Connection("push unavailable".into()));
        }
        let (tx, rx) = mpsc::channel(64);
        state.push_senders.insert(id.clone(), tx);
        Ok(rx)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
