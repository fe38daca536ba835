// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent lifecycle state machine.
//!
//! ```text
//! queued  ──► running | paused | completed | failed
//! running ──► paused | completed | failed
//! paused  ──► running | failed
//! ```
//!
//! `completed` and `failed` are absorbing: once an agent reaches either,
//! no later delivery may move it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Single authoritative status of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Queued,
    Running,
    Paused,
    Completed,
    Failed,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 5] = [
        AgentStatus::Queued,
        AgentStatus::Running,
        AgentStatus::Paused,
        AgentStatus::Completed,
        AgentStatus::Failed,
    ];

    /// Whether this status is terminal (no further transitions allowed)
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentStatus::Completed | AgentStatus::Failed)
    }

    /// Whether moving from `self` to `next` is a real forward transition.
    ///
    /// Staying in the same status is not a transition and returns `false`.
    pub fn can_transition_to(self, next: AgentStatus) -> bool {
        use AgentStatus::*;
        matches!(
            (self, next),
            (Queued, Running | Paused | Completed | Failed)
                | (Running, Paused | Completed | Failed)
                | (Paused, Running | Failed)
        )
    }

    /// Whether `next` can follow `self` through one or more transitions.
    ///
    /// A snapshot taken after missed deliveries may skip intermediate
    /// states (`paused` straight to `completed`); it still moves forward.
    pub fn can_reach(self, next: AgentStatus) -> bool {
        !self.is_terminal() && next != self && next != AgentStatus::Queued
    }

    /// Whether a user command may be issued against an agent in this status
    pub fn permits(self, action: Action) -> bool {
        use AgentStatus::*;
        match action {
            Action::Launch => true,
            Action::Pause => self == Running,
            Action::Resume => self == Paused,
            Action::Cancel => matches!(self, Queued | Running | Paused),
            Action::Delete => self.is_terminal(),
            Action::Intervene => matches!(self, Running | Paused),
        }
    }
}

crate::simple_display! {
    AgentStatus {
        Queued => "queued",
        Running => "running",
        Paused => "paused",
        Completed => "completed",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown agent status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AgentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" => Ok(AgentStatus::Queued),
            "running" => Ok(AgentStatus::Running),
            "paused" => Ok(AgentStatus::Paused),
            "completed" | "done" => Ok(AgentStatus::Completed),
            "failed" => Ok(AgentStatus::Failed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Imperative commands a user can issue against agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Launch,
    Pause,
    Resume,
    Cancel,
    Delete,
    Intervene,
}

crate::simple_display! {
    Action {
        Launch => "launch",
        Pause => "pause",
        Resume => "resume",
        Cancel => "cancel",
        Delete => "delete",
        Intervene => "intervene",
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
