// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::log::{LogEntry, LogLevel};
use crate::task::TaskStatus;

fn snapshot(status: AgentStatus) -> AgentUpdate {
    AgentUpdate::new("agt-1").name("fixer").prompt("fix the build").status(status)
}

#[test]
fn snapshot_without_name_is_rejected() {
    let update = AgentUpdate::new("agt-1").status(AgentStatus::Queued);
    assert_eq!(
        AgentRecord::from_snapshot(update, 0, 1).unwrap_err(),
        SnapshotError::MissingName(AgentId::new("agt-1"))
    );
}

#[test]
fn snapshot_without_status_is_rejected() {
    let update = AgentUpdate::new("agt-1").name("fixer");
    assert!(matches!(
        AgentRecord::from_snapshot(update, 0, 1),
        Err(SnapshotError::MissingStatus(_))
    ));
}

#[test]
fn queued_snapshot_has_no_completion_fields() {
    let update = snapshot(AgentStatus::Queued)
        .completed_at_ms(99u64)
        .error("leftover")
        .result_summary("leftover");
    let record = AgentRecord::from_snapshot(update, 0, 1_000).unwrap();
    assert_eq!(record.created_at_ms, 1_000);
    assert_eq!(record.completed_at_ms, None);
    assert_eq!(record.error, None);
    assert_eq!(record.result_summary, None);
}

#[test]
fn terminal_snapshot_always_has_completion_time() {
    let record = AgentRecord::from_snapshot(snapshot(AgentStatus::Failed).error("boom"), 0, 7_000)
        .unwrap();
    assert_eq!(record.completed_at_ms, Some(7_000));
    assert_eq!(record.error.as_deref(), Some("boom"));

    let record = AgentRecord::from_snapshot(
        snapshot(AgentStatus::Completed).completed_at_ms(5_000u64).result_summary("ok"),
        0,
        7_000,
    )
    .unwrap();
    assert_eq!(record.completed_at_ms, Some(5_000));
    assert_eq!(record.result_summary.as_deref(), Some("ok"));
}

#[test]
fn snapshot_logs_respect_capacity() {
    let logs = (1..=4).map(|i| LogEntry::new(i, LogLevel::Info, format!("line {i}"))).collect();
    let record =
        AgentRecord::from_snapshot(snapshot(AgentStatus::Running).logs(logs), 3, 1).unwrap();
    assert_eq!(record.logs.len(), 3);
    assert_eq!(record.logs.total_len(), 4);
}

#[test]
fn display_progress_prefers_task_tree() {
    let record = AgentRecord::builder()
        .status(AgentStatus::Running)
        .progress(40)
        .tasks(vec![
            TaskNode::new("a", "plan", TaskStatus::Completed),
            TaskNode::new("b", "code", TaskStatus::Completed),
            TaskNode::new("c", "test", TaskStatus::InProgress),
            TaskNode::new("d", "ship", TaskStatus::Pending),
        ])
        .build();
    assert_eq!(record.display_progress(), 63);

    let bare = AgentRecord::builder().progress(40).build();
    assert_eq!(bare.display_progress(), 40);
}

#[test]
fn duration_needs_both_timestamps() {
    let running = AgentRecord::builder().started_at_ms(1_000u64).build();
    assert_eq!(running.duration_ms(), None);

    let done = AgentRecord::builder()
        .status(AgentStatus::Completed)
        .started_at_ms(1_000u64)
        .completed_at_ms(61_000u64)
        .build();
    assert_eq!(done.duration_ms(), Some(60_000));
}

#[test]
fn record_round_trips_through_its_snapshot() {
    let record = AgentRecord::builder()
        .status(AgentStatus::Paused)
        .progress(55)
        .branch("agent/fix-build")
        .started_at_ms(2_000u64)
        .revision(4u64)
        .build();
    let rebuilt = AgentRecord::from_snapshot(AgentUpdate::from_record(&record), 0, 9).unwrap();
    assert_eq!(rebuilt, record);
}

#[test]
fn revision_is_not_serialized() {
    let record = AgentRecord::builder().revision(12u64).build();
    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("revision").is_none());
    assert_eq!(json["status"], "queued");
    assert_eq!(json["createdAt"], 1_000_000);
}
