// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical per-agent state.
//!
//! Invariants held by every writer:
//! - `completed_at_ms` is set iff `status` is terminal
//! - `logs` is append-only (see [`LogBuffer`])
//! - `error` only accompanies `failed`, `result_summary` only `completed`
//! - `branch` and `pr_url` are set once and never retracted

use crate::agent::AgentStatus;
use crate::id::AgentId;
use crate::log::LogBuffer;
use crate::task::{compute_progress, TaskNode};
use crate::update::AgentUpdate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub id: AgentId,
    pub name: String,
    pub prompt: String,
    pub status: AgentStatus,
    /// Raw progress as last reported, 0-100
    pub progress: u8,
    pub tasks: Vec<TaskNode>,
    pub logs: LogBuffer,
    pub branch: Option<String>,
    pub pr_url: Option<String>,
    pub error: Option<String>,
    pub result_summary: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at_ms: u64,
    #[serde(rename = "startedAt")]
    pub started_at_ms: Option<u64>,
    #[serde(rename = "completedAt")]
    pub completed_at_ms: Option<u64>,
    /// Staleness guard for reconciliation; not shown to users
    #[serde(skip_serializing, default)]
    pub revision: Option<u64>,
}

/// A snapshot lacked a field needed to create a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot for {0} has no name")]
    MissingName(AgentId),
    #[error("snapshot for {0} has no status")]
    MissingStatus(AgentId),
}

impl AgentRecord {
    /// Build a new record from a full snapshot.
    ///
    /// `now_ms` fills `created_at_ms` when absent and `completed_at_ms` when a
    /// terminal snapshot omits it. A non-terminal snapshot never carries a
    /// completion time or terminal payload.
    pub fn from_snapshot(
        update: AgentUpdate,
        log_capacity: usize,
        now_ms: u64,
    ) -> Result<Self, SnapshotError> {
        let name = update.name.ok_or_else(|| SnapshotError::MissingName(update.id.clone()))?;
        let status = update.status.ok_or_else(|| SnapshotError::MissingStatus(update.id.clone()))?;

        let mut logs = LogBuffer::new(log_capacity);
        logs.append_after(update.logs);

        let terminal = status.is_terminal();
        Ok(Self {
            id: update.id,
            name,
            prompt: update.prompt.unwrap_or_default(),
            status,
            progress: update.progress.unwrap_or(0).min(100),
            tasks: update.tasks.unwrap_or_default(),
            logs,
            branch: update.branch,
            pr_url: update.pr_url,
            error: if status == AgentStatus::Failed { update.error } else { None },
            result_summary: if status == AgentStatus::Completed {
                update.result_summary
            } else {
                None
            },
            created_at_ms: update.created_at_ms.unwrap_or(now_ms),
            started_at_ms: update.started_at_ms,
            completed_at_ms: if terminal {
                Some(update.completed_at_ms.unwrap_or(now_ms))
            } else {
                None
            },
            revision: update.revision,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress shown to users: derived from the task tree when one exists
    pub fn display_progress(&self) -> u8 {
        compute_progress(&self.tasks, self.progress)
    }

    /// Run time of a finished agent
    pub fn duration_ms(&self) -> Option<u64> {
        let started = self.started_at_ms?;
        let completed = self.completed_at_ms?;
        Some(completed.saturating_sub(started))
    }
}

crate::builder! {
    pub struct AgentRecordBuilder => AgentRecord {
        into {
            id: AgentId = "agt-test",
            name: String = "test-agent",
            prompt: String = "do the thing",
        }
        set {
            status: AgentStatus = AgentStatus::Queued,
            progress: u8 = 0,
            tasks: Vec<TaskNode> = Vec::new(),
            logs: LogBuffer = LogBuffer::default(),
            created_at_ms: u64 = 1_000_000,
        }
        option {
            branch: String = None,
            pr_url: String = None,
            error: String = None,
            result_summary: String = None,
            started_at_ms: u64 = None,
            completed_at_ms: u64 = None,
            revision: u64 = None,
        }
    }
}

#[cfg(test)]
#[path = "agent_record_tests.rs"]
mod tests;
