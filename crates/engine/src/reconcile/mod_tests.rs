// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use deck_core::test_support::strategies::arb_status_path;
use deck_core::test_support::{info, queued_snapshot, record};
use deck_core::{FakeClock, TaskNode, TaskStatus};
use proptest::prelude::*;

const NOW: u64 = 2_000_000;

fn reconciler() -> Reconciler<FakeClock> {
    Reconciler::new(Store::new(), PendingActions::new(), FakeClock::at(NOW), 0)
}

fn track(reconciler: &Reconciler<FakeClock>, record: AgentRecord) {
    reconciler.store().write(|registry| registry.upsert(record));
}

fn current(reconciler: &Reconciler<FakeClock>, id: &str) -> AgentRecord {
    reconciler.store().get(&AgentId::new(id)).unwrap()
}

fn log_lines(reconciler: &Reconciler<FakeClock>) -> Vec<LogEntry> {
    current(reconciler, "agt-1").logs.iter().cloned().collect()
}

#[test]
fn update_for_untracked_agent_is_discarded() {
    let reconciler = reconciler();
    let outcome = reconciler
        .apply(AgentUpdate::new("agt-9").status(AgentStatus::Running), UpdateSource::Push);
    assert_eq!(outcome, ReconcileOutcome::Discarded(DiscardReason::UnknownAgent));
    assert!(reconciler.store().read(|r| r.is_empty()));
    assert_eq!(reconciler.diagnostics().unknown_agent, 1);
}

#[test]
fn stale_poll_after_push_is_discarded() {
    let reconciler = reconciler();
    reconciler.admit(queued_snapshot("agt-1", "fixer", 1), UpdateSource::Command).unwrap();

    let push =
        AgentUpdate::new("agt-1").status(AgentStatus::Running).progress(40u8).revision(3u64);
    assert!(reconciler.apply(push, UpdateSource::Push).is_applied());

    let poll = AgentUpdate::new("agt-1").status(AgentStatus::Queued).revision(2u64);
    assert_eq!(
        reconciler.apply(poll, UpdateSource::Poll),
        ReconcileOutcome::Discarded(DiscardReason::Stale)
    );

    let record = current(&reconciler, "agt-1");
    assert_eq!(record.status, AgentStatus::Running);
    assert_eq!(record.progress, 40);
}

#[test]
fn stale_poll_without_revisions_is_discarded() {
    let reconciler = reconciler();
    track(&reconciler, record("agt-1", AgentStatus::Queued));

    let push = AgentUpdate::new("agt-1").status(AgentStatus::Running).progress(40u8);
    assert!(reconciler.apply(push, UpdateSource::Push).is_applied());

    let poll = AgentUpdate::new("agt-1").status(AgentStatus::Queued).progress(0u8);
    assert!(!reconciler.apply(poll, UpdateSource::Poll).is_applied());

    let record = current(&reconciler, "agt-1");
    assert_eq!(record.status, AgentStatus::Running);
    assert_eq!(record.progress, 40);
}

#[test]
fn tree_and_pr_link_land_without_revisions() {
    let reconciler = reconciler();
    track(&reconciler, record("agt-1", AgentStatus::Running));

    let tree = vec![
        TaskNode::new("a", "setup", TaskStatus::Completed),
        TaskNode::new("b", "fix", TaskStatus::Pending),
    ];
    let poll = AgentUpdate::new("agt-1").status(AgentStatus::Running).tasks(tree);
    assert!(reconciler.apply(poll, UpdateSource::Poll).is_applied());

    let push = AgentUpdate::new("agt-1").pr_url("https://example.test/pr/8");
    assert!(reconciler.apply(push, UpdateSource::Push).is_applied());

    let record = current(&reconciler, "agt-1");
    assert_eq!(record.tasks.len(), 2);
    assert_eq!(record.pr_url.as_deref(), Some("https://example.test/pr/8"));
}

#[test]
fn completed_agent_never_runs_again() {
    let reconciler = reconciler();
    track(&reconciler, record("agt-1", AgentStatus::Completed));
    let before = current(&reconciler, "agt-1");

    let outcome = reconciler.apply(
        AgentUpdate::new("agt-1").status(AgentStatus::Running).progress(99u8),
        UpdateSource::Push,
    );
    assert_eq!(
        outcome,
        ReconcileOutcome::Discarded(DiscardReason::InvalidTransition {
            from: AgentStatus::Completed,
            to: AgentStatus::Running,
        })
    );
    assert_eq!(current(&reconciler, "agt-1"), before);
    assert_eq!(reconciler.diagnostics().invalid_transition, 1);
}

#[test]
fn discarded_updates_do_not_bump_the_change_feed() {
    let reconciler = reconciler();
    track(&reconciler, record("agt-1", AgentStatus::Running));
    let rx = reconciler.store().changes();
    let version = *rx.borrow();

    reconciler.apply(AgentUpdate::new("agt-1").status(AgentStatus::Running), UpdateSource::Poll);
    assert_eq!(*rx.borrow(), version);

    reconciler.apply(AgentUpdate::new("agt-1").progress(10u8), UpdateSource::Poll);
    assert_eq!(*rx.borrow(), version + 1);
}

#[test]
fn terminal_status_stamps_completion_from_clock() {
    let reconciler = reconciler();
    track(&reconciler, record("agt-1", AgentStatus::Running));
    reconciler.apply(AgentUpdate::new("agt-1").status(AgentStatus::Completed), UpdateSource::Poll);
    assert_eq!(current(&reconciler, "agt-1").completed_at_ms, Some(NOW));
}

#[test]
fn status_change_clears_pending_action() {
    let reconciler = reconciler();
    let id = AgentId::new("agt-1");
    track(&reconciler, record("agt-1", AgentStatus::Running));
    reconciler.pending().set(&id, Action::Pause);

    reconciler.apply(AgentUpdate::new("agt-1").progress(50u8), UpdateSource::Push);
    assert_eq!(reconciler.pending().get(&id), Some(Action::Pause));

    reconciler.apply(AgentUpdate::new("agt-1").status(AgentStatus::Paused), UpdateSource::Push);
    assert_eq!(reconciler.pending().get(&id), None);
}

#[test]
fn pending_cancel_marks_failure_as_cancelled() {
    let reconciler = reconciler();
    let id = AgentId::new("agt-1");
    track(&reconciler, record("agt-1", AgentStatus::Running));
    reconciler.pending().set(&id, Action::Cancel);

    reconciler.apply(AgentUpdate::new("agt-1").status(AgentStatus::Failed), UpdateSource::Push);
    let record = current(&reconciler, "agt-1");
    assert_eq!(record.error.as_deref(), Some("cancelled"));
    assert_eq!(reconciler.pending().get(&id), None);
}

#[test]
fn admit_creates_then_reconciles() {
    let reconciler = reconciler();
    let created = reconciler.admit(queued_snapshot("agt-1", "fixer", 1), UpdateSource::Hydrate);
    assert_eq!(created, Ok(ReconcileOutcome::Applied));

    let again = reconciler.admit(queued_snapshot("agt-1", "fixer", 1), UpdateSource::Hydrate);
    assert_eq!(again, Ok(ReconcileOutcome::Discarded(DiscardReason::Stale)));
    assert_eq!(reconciler.store().read(|r| r.len()), 1);
}

#[test]
fn admit_rejects_incomplete_snapshot() {
    let reconciler = reconciler();
    let nameless = AgentUpdate::new("agt-1").status(AgentStatus::Queued);
    let result = reconciler.admit(nameless, UpdateSource::Hydrate);
    assert_eq!(result, Err(SnapshotError::MissingName(AgentId::new("agt-1"))));
    assert!(reconciler.store().read(|r| r.is_empty()));
}

#[test]
fn live_logs_append_after_last_entry() {
    let reconciler = reconciler();
    let id = AgentId::new("agt-1");
    track(&reconciler, record("agt-1", AgentStatus::Running));

    assert_eq!(reconciler.append_logs(&id, vec![info(10, "a"), info(20, "b")]), 2);
    assert_eq!(reconciler.append_logs(&id, vec![info(20, "b"), info(15, "late")]), 0);
    assert_eq!(reconciler.append_logs(&AgentId::new("agt-9"), vec![info(30, "x")]), 0);
    assert_eq!(current(&reconciler, "agt-1").logs.len(), 2);
}

#[test]
fn log_capacity_bounds_admitted_records() {
    let reconciler = Reconciler::new(Store::new(), PendingActions::new(), FakeClock::at(NOW), 2);
    let snapshot = queued_snapshot("agt-1", "fixer", 1)
        .logs(vec![info(1, "a"), info(2, "b"), info(3, "c")]);
    reconciler.admit(snapshot, UpdateSource::Command).unwrap();

    let record = current(&reconciler, "agt-1");
    assert_eq!(record.logs.len(), 2);
    assert_eq!(record.logs.total_len(), 3);
}

/// Cumulative snapshots a backend would publish while walking `path`
fn cumulative_snapshots(path: &[AgentStatus]) -> Vec<AgentUpdate> {
    path.iter()
        .enumerate()
        .map(|(step, &status)| {
            let step = step as u64;
            let logs = (0..=step).map(|n| info(1_000 + n * 10, &format!("step {n}"))).collect();
            let mut update = queued_snapshot("agt-1", "fixer", step + 1)
                .status(status)
                .progress((step * 20) as u8)
                .logs(logs);
            if status != AgentStatus::Queued {
                update = update.started_at_ms(1_100_000u64).branch("deck/fix");
            }
            if status.is_terminal() {
                update = update.completed_at_ms(1_900_000u64);
            }
            match status {
                AgentStatus::Failed => update.error("boom"),
                AgentStatus::Completed => update.result_summary("done"),
                _ => update,
            }
        })
        .collect()
}

fn deliver_all(updates: &[AgentUpdate]) -> AgentRecord {
    let reconciler = reconciler();
    for (i, update) in updates.iter().enumerate() {
        let source = if i % 2 == 0 { UpdateSource::Push } else { UpdateSource::Poll };
        reconciler.admit(update.clone(), source).unwrap();
    }
    current(&reconciler, "agt-1")
}

fn arb_deliveries() -> impl Strategy<Value = (Vec<AgentUpdate>, Vec<AgentUpdate>)> {
    arb_status_path().prop_flat_map(|path| {
        let snapshots = cumulative_snapshots(&path);
        (Just(snapshots.clone()), Just(snapshots).prop_shuffle())
    })
}

proptest! {
    /// The final record depends only on which updates arrived, not on the
    /// order push and poll happened to deliver them in.
    #[test]
    fn delivery_order_does_not_matter((in_order, shuffled) in arb_deliveries()) {
        prop_assert_eq!(deliver_all(&shuffled), deliver_all(&in_order));
    }

    /// Redelivering everything changes nothing.
    #[test]
    fn redelivery_is_idempotent((in_order, shuffled) in arb_deliveries()) {
        let mut twice = shuffled.clone();
        twice.extend(in_order.iter().cloned());
        prop_assert_eq!(deliver_all(&twice), deliver_all(&shuffled));
    }

    /// Whatever mix of deltas arrives, no log line is ever lost or reordered.
    #[test]
    fn logs_never_shrink(batches in proptest::collection::vec(
        proptest::collection::vec(0u64..50, 0..5), 1..10)
    ) {
        let reconciler = reconciler();
        track(&reconciler, record("agt-1", AgentStatus::Running));
        for (round, batch) in batches.into_iter().enumerate() {
            let before = log_lines(&reconciler);
            let entries = batch.into_iter().map(|ts| info(ts, &format!("r{round}"))).collect();
            reconciler.apply(AgentUpdate::new("agt-1").logs(entries), UpdateSource::Push);
            let after = log_lines(&reconciler);
            prop_assert!(after.len() >= before.len());
            prop_assert_eq!(&after[..before.len()], &before[..]);
        }
    }
}
