// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{AgentId, AgentRecord, AgentStatus, AgentUpdate, LogEntry, LogLevel};

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::task::{TaskNode, TaskStatus};
    use crate::AgentStatus;
    use proptest::prelude::*;

    pub fn arb_agent_status() -> impl Strategy<Value = AgentStatus> {
        prop_oneof![
            Just(AgentStatus::Queued),
            Just(AgentStatus::Running),
            Just(AgentStatus::Paused),
            Just(AgentStatus::Completed),
            Just(AgentStatus::Failed),
        ]
    }

    pub fn arb_task_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Pending),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Failed),
        ]
    }

    /// Task trees up to `depth` levels with at most 4 children per node
    pub fn arb_task_tree(depth: u32) -> impl Strategy<Value = TaskNode> {
        let leaf = (0u32..1000, arb_task_status())
            .prop_map(|(n, status)| TaskNode::new(format!("t{n}"), format!("task {n}"), status));
        leaf.prop_recursive(depth, 32, 4, |inner| {
            (0u32..1000, arb_task_status(), proptest::collection::vec(inner, 1..4)).prop_map(
                |(n, status, children)| {
                    TaskNode::new(format!("t{n}"), format!("group {n}"), status)
                        .with_children(children)
                },
            )
        })
    }

    /// A valid lifecycle path starting at `queued`, one status per step
    pub fn arb_status_path() -> impl Strategy<Value = Vec<AgentStatus>> {
        use AgentStatus::*;
        prop_oneof![
            Just(vec![Queued]),
            Just(vec![Queued, Running]),
            Just(vec![Queued, Running, Completed]),
            Just(vec![Queued, Running, Failed]),
            Just(vec![Queued, Running, Paused, Running, Completed]),
            Just(vec![Queued, Running, Paused, Failed]),
            Just(vec![Queued, Failed]),
        ]
    }
}

// ── Factories ───────────────────────────────────────────────────────────

/// Full snapshot of a freshly launched agent
pub fn queued_snapshot(id: &str, name: &str, revision: u64) -> AgentUpdate {
    AgentUpdate::new(id)
        .name(name)
        .prompt(format!("prompt for {name}"))
        .status(AgentStatus::Queued)
        .progress(0u8)
        .created_at_ms(1_000_000u64)
        .revision(revision)
}

/// A tracked record in `status`, keeping the completion invariant
pub fn record(id: &str, status: AgentStatus) -> AgentRecord {
    let mut builder = AgentRecord::builder().id(AgentId::new(id)).name(id).status(status);
    if status != AgentStatus::Queued {
        builder = builder.started_at_ms(1_100_000u64);
    }
    if status.is_terminal() {
        builder = builder.completed_at_ms(1_700_000u64);
    }
    builder.build()
}

pub fn info(ts: u64, message: &str) -> LogEntry {
    LogEntry::new(ts, LogLevel::Info, message)
}
