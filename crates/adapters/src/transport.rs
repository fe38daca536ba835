// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport traits consumed by the engine.
//!
//! Four independent collaborators: commands, polls, pushes, and stats. A
//! [`Backend`] is anything that provides the three request/response ones;
//! push delivery is kept separate since it usually rides another protocol.

use async_trait::async_trait;
use deck_core::{Action, AgentId, AgentStats, AgentUpdate, LaunchConfig, LogEntry};
use deck_wire::{LogQuery, ProtocolError};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from any transport call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The backend understood the request and refused it
    #[error("rejected ({reason}): {message}")]
    Rejected { reason: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    /// The backend answered with something unreadable
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<ProtocolError> for TransportError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e.to_string())
    }
}

impl TransportError {
    pub fn rejected(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected { reason: reason.into(), message: message.into() }
    }

    /// Whether the backend definitely did not act on the request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::NotFound(_))
    }
}

/// Imperative requests (`POST` per action)
#[async_trait]
pub trait CommandTransport: Clone + Send + Sync + 'static {
    /// Create an agent; the response is its first authoritative snapshot
    async fn launch(&self, config: &LaunchConfig) -> Result<AgentUpdate, TransportError>;

    /// Pause, resume, cancel or delete. The backend may answer with the
    /// updated snapshot or with an empty acknowledgement.
    async fn act(&self, id: &AgentId, action: Action)
        -> Result<Option<AgentUpdate>, TransportError>;

    async fn intervene(&self, id: &AgentId, message: &str) -> Result<(), TransportError>;

    /// Delete several terminal agents; all or nothing
    async fn delete_many(&self, ids: &[AgentId]) -> Result<(), TransportError>;

    /// Every agent the backend knows about, as full snapshots
    async fn list_agents(&self) -> Result<Vec<AgentUpdate>, TransportError>;
}

/// Full-state reads (`GET`), safe to call redundantly
#[async_trait]
pub trait PollTransport: Clone + Send + Sync + 'static {
    async fn fetch_agent(&self, id: &AgentId) -> Result<AgentUpdate, TransportError>;

    /// One page of log history in chronological order
    async fn fetch_logs(
        &self,
        id: &AgentId,
        query: LogQuery,
    ) -> Result<Vec<LogEntry>, TransportError>;
}

#[async_trait]
pub trait StatsTransport: Clone + Send + Sync + 'static {
    async fn fetch_stats(&self, window_days: u32) -> Result<AgentStats, TransportError>;
}

/// Server-initiated updates for one agent.
///
/// The returned channel closes when the stream drops; dropping the receiver
/// tears the stream down. No ordering or exactly-once delivery is assumed.
#[async_trait]
pub trait PushTransport: Clone + Send + Sync + 'static {
    async fn subscribe(&self, id: &AgentId) -> Result<mpsc::Receiver<AgentUpdate>, TransportError>;
}

/// Request/response side of the agent backend
pub trait Backend: CommandTransport + PollTransport + StatsTransport {}

impl<T: CommandTransport + PollTransport + StatsTransport> Backend for T {}
