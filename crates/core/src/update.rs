// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incoming agent state, as delivered by push, poll, or command responses.
//!
//! Every field except `id` is optional: a full snapshot sets all of them,
//! a delta only the ones that changed. `logs` carries new entries only in a
//! delta and the whole known history in a snapshot; the append rule treats
//! both the same way.

use crate::agent::AgentStatus;
use crate::agent_record::AgentRecord;
use crate::id::AgentId;
use crate::log::LogEntry;
use crate::task::TaskNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentUpdate {
    pub id: AgentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Complete tree when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskNode>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_summary: Option<String>,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at_ms: Option<u64>,
    #[serde(default, rename = "startedAt", skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, rename = "completedAt", skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    /// Monotonic sequence number assigned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
}

impl AgentUpdate {
    /// An empty update for `id`
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            prompt: None,
            status: None,
            progress: None,
            tasks: None,
            logs: Vec::new(),
            branch: None,
            pr_url: None,
            error: None,
            result_summary: None,
            created_at_ms: None,
            started_at_ms: None,
            completed_at_ms: None,
            revision: None,
        }
    }

    crate::setters! {
        set {
            logs: Vec<LogEntry>,
        }
        option {
            name: String,
            prompt: String,
            status: AgentStatus,
            progress: u8,
            tasks: Vec<TaskNode>,
            branch: String,
            pr_url: String,
            error: String,
            result_summary: String,
            created_at_ms: u64,
            started_at_ms: u64,
            completed_at_ms: u64,
            revision: u64,
        }
    }

    /// Full snapshot of a tracked record, including its retained logs
    pub fn from_record(record: &AgentRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: Some(record.name.clone()),
            prompt: Some(record.prompt.clone()),
            status: Some(record.status),
            progress: Some(record.progress),
            tasks: Some(record.tasks.clone()),
            logs: record.logs.iter().cloned().collect(),
            branch: record.branch.clone(),
            pr_url: record.pr_url.clone(),
            error: record.error.clone(),
            result_summary: record.result_summary.clone(),
            created_at_ms: Some(record.created_at_ms),
            started_at_ms: record.started_at_ms,
            completed_at_ms: record.completed_at_ms,
            revision: record.revision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_delta_deserializes() {
        let update: AgentUpdate =
            serde_json::from_str(r#"{"id":"a1","status":"running","progress":40}"#).unwrap();
        assert_eq!(update, AgentUpdate::new("a1").status(AgentStatus::Running).progress(40u8));
        assert!(update.logs.is_empty());
        assert!(update.tasks.is_none());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let update = AgentUpdate::new("a1")
            .pr_url("https://example.test/pr/1")
            .result_summary("done")
            .started_at_ms(5u64)
            .completed_at_ms(9u64);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a1",
                "prUrl": "https://example.test/pr/1",
                "resultSummary": "done",
                "startedAt": 5,
                "completedAt": 9,
            })
        );
    }
}
