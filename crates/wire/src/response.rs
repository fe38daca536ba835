// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response bodies returned by the agent backend.
//!
//! Single-agent responses (launch, poll, command acknowledgements) are bare
//! [`deck_core::AgentUpdate`] snapshots; stats are [`deck_core::AgentStats`].

use deck_core::{AgentId, AgentUpdate, LogEntry};
use serde::{Deserialize, Serialize};

/// Machine-readable rejection reasons understood by the client
pub mod reason {
    pub const INVALID_TRANSITION: &str = "invalid_transition";
    pub const LAUNCH_REJECTED: &str = "launch_rejected";
    pub const INVALID_PROJECT: &str = "invalid_project";
    pub const VALIDATION: &str = "validation";
    pub const NOT_FOUND: &str = "not_found";
    pub const EMPTY_MESSAGE: &str = "empty_message";
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorBody {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self { reason: reason.into(), message: message.into() }
    }

    /// Parse an error body, tolerating servers that send plain text
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// `GET /api/agents`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentList {
    pub agents: Vec<AgentUpdate>,
}

/// `GET /api/agents/{id}/logs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    /// Chronological order
    pub logs: Vec<LogEntry>,
}

/// `POST /api/agents/delete`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteManyResponse {
    pub deleted: Vec<AgentId>,
}
