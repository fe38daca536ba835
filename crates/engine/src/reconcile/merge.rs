// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staleness check and field-by-field merge of one update into a record.

use deck_core::{AgentRecord, AgentStatus, AgentUpdate};

/// How an update compares to the record it targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Freshness {
    Newer,
    Stale,
    Invalid { from: AgentStatus, to: AgentStatus },
}

/// Decide whether `update` carries anything `current` does not.
///
/// A status the record cannot reach going forward is invalid regardless of
/// revision. Otherwise, with a revision on both sides the revision decides.
/// Without one, the update must differ structurally: a log line past the
/// last known timestamp, a forward status, more progress in the same status,
/// a different task tree, or a value for a one-time field still unset.
pub(crate) fn freshness(current: &AgentRecord, update: &AgentUpdate) -> Freshness {
    let invalid = update
        .status
        .filter(|&to| to != current.status && !current.status.can_reach(to))
        .map(|to| Freshness::Invalid { from: current.status, to });

    if let (Some(incoming), Some(known)) = (update.revision, current.revision) {
        if incoming <= known {
            return Freshness::Stale;
        }
        return invalid.unwrap_or(Freshness::Newer);
    }
    if let Some(invalid) = invalid {
        return invalid;
    }

    let forward = update.status.is_some_and(|to| current.status.can_reach(to));
    let same_status = update.status.map_or(true, |to| to == current.status);
    let more_progress =
        same_status && update.progress.is_some_and(|p| p.min(100) > current.progress);

    let new_tree = update.tasks.as_ref().is_some_and(|tasks| *tasks != current.tasks);

    if forward
        || more_progress
        || new_tree
        || fills_unset(current, update)
        || current.logs.has_newer(&update.logs)
    {
        Freshness::Newer
    } else {
        Freshness::Stale
    }
}

/// Whether `update` sets branch, PR link or the terminal payload for the
/// first time
fn fills_unset(current: &AgentRecord, update: &AgentUpdate) -> bool {
    let status = update.status.unwrap_or(current.status);
    let fills = |known: &Option<String>, incoming: &Option<String>| {
        known.is_none() && incoming.is_some()
    };
    fills(&current.branch, &update.branch)
        || fills(&current.pr_url, &update.pr_url)
        || (status == AgentStatus::Failed && fills(&current.error, &update.error))
        || (status == AgentStatus::Completed
            && fills(&current.result_summary, &update.result_summary))
}

/// Merge a newer `update` into a copy of `current`.
///
/// `cancelling` marks an agent with a cancel request in flight, so that a
/// failure it ends in reads as a cancellation.
pub(crate) fn merge(
    current: &AgentRecord,
    update: AgentUpdate,
    now_ms: u64,
    cancelling: bool,
) -> AgentRecord {
    let mut next = current.clone();
    let status = update.status.unwrap_or(current.status);
    let entering_terminal = status.is_terminal() && !current.status.is_terminal();
    next.status = status;

    if let Some(progress) = update.progress {
        let progress = progress.min(100);
        next.progress = if status.is_terminal() { progress } else { next.progress.max(progress) };
    }
    if let Some(tasks) = update.tasks {
        next.tasks = tasks;
    }
    next.logs.append_after(update.logs);

    if next.branch.is_none() {
        next.branch = update.branch;
    }
    if next.pr_url.is_none() {
        next.pr_url = update.pr_url;
    }
    if next.started_at_ms.is_none() {
        next.started_at_ms = update
            .started_at_ms
            .or_else(|| (status == AgentStatus::Running).then_some(now_ms));
    }
    if entering_terminal {
        next.completed_at_ms = Some(update.completed_at_ms.unwrap_or(now_ms));
    }

    next.error = match status {
        AgentStatus::Failed => update.error.or(next.error),
        _ => None,
    };
    if status == AgentStatus::Failed && entering_terminal && cancelling {
        next.error = Some(cancel_marker(next.error.take()));
    }
    next.result_summary = match status {
        AgentStatus::Completed => update.result_summary.or(next.result_summary),
        _ => None,
    };

    next.revision = next.revision.max(update.revision);
    next
}

fn cancel_marker(error: Option<String>) -> String {
    match error {
        None => "cancelled".to_string(),
        Some(e) if e.starts_with("cancelled") => e,
        Some(e) => format!("cancelled: {e}"),
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
