// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical task tree and derived progress.
//!
//! A node with children has no status of its own: its effective status is
//! derived from its leaves. The backend always sends the complete tree, so
//! trees are replaced wholesale and never patched node by node.

use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

crate::simple_display! {
    TaskStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>, status: TaskStatus) -> Self {
        Self { id: id.into(), name: name.into(), status, children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<TaskNode>) -> Self {
        self.children = children;
        self
    }

    /// Status as shown for this node.
    ///
    /// Leaves report their own status. A parent is `in_progress` if any
    /// descendant is, `failed` if any descendant failed and none is still in
    /// progress, `completed` only if every descendant completed, and
    /// `pending` otherwise.
    pub fn effective_status(&self) -> TaskStatus {
        if self.children.is_empty() {
            return self.status;
        }
        let mut any_failed = false;
        let mut all_completed = true;
        for child in &self.children {
            match child.effective_status() {
                TaskStatus::InProgress => return TaskStatus::InProgress,
                TaskStatus::Failed => {
                    any_failed = true;
                    all_completed = false;
                }
                TaskStatus::Pending => all_completed = false,
                TaskStatus::Completed => {}
            }
        }
        if any_failed {
            TaskStatus::Failed
        } else if all_completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TaskNode::node_count).sum::<usize>()
    }
}

/// Percentage of the top-level task list that is done.
///
/// Completed tasks count fully and in-progress tasks count half; nested
/// children only influence their parent's effective status. An empty list
/// yields `fallback` (the agent's own progress) so a freshly launched agent
/// does not flash 0%.
pub fn compute_progress(tasks: &[TaskNode], fallback: u8) -> u8 {
    if tasks.is_empty() {
        return fallback;
    }
    let mut done = 0.0_f64;
    for task in tasks {
        match task.effective_status() {
            TaskStatus::Completed => done += 1.0,
            TaskStatus::InProgress => done += 0.5,
            TaskStatus::Pending | TaskStatus::Failed => {}
        }
    }
    let pct = (100.0 * done / tasks.len() as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Ids of every ancestor of an in-progress leaf.
///
/// Presentation helper: these nodes start expanded so the active work is
/// visible. Nothing here is stored on the tree.
pub fn expanded_task_ids(tasks: &[TaskNode]) -> HashSet<TaskId> {
    fn walk(node: &TaskNode, out: &mut HashSet<TaskId>) -> bool {
        if node.children.is_empty() {
            return node.status == TaskStatus::InProgress;
        }
        let mut active = false;
        for child in &node.children {
            // No short-circuit: every active branch must be collected
            active |= walk(child, out);
        }
        if active {
            out.insert(node.id.clone());
        }
        active
    }

    let mut out = HashSet::new();
    for task in tasks {
        walk(task, &mut out);
    }
    out
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
