// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::pending::PendingActions;
use crate::store::Store;
use deck_adapters::FakeTransport;
use deck_core::test_support::record;
use deck_core::{AgentStatus, FakeClock};
use std::time::Duration;
use tokio::time::sleep;

type Manager = SubscriptionManager<FakeTransport, FakeTransport, FakeClock>;

struct Harness {
    manager: Manager,
    backend: FakeTransport,
    store: Store,
}

impl Harness {
    fn new() -> Self {
        let backend = FakeTransport::new();
        let store = Store::new();
        let reconciler = Reconciler::new(store.clone(), PendingActions::new(), FakeClock::new(), 0);
        let manager =
            SubscriptionManager::new(backend.clone(), backend.clone(), reconciler, config());
        Self { manager, backend, store }
    }

    fn seed(&self, status: AgentStatus) -> AgentId {
        self.store.write(|r| r.upsert(record("agt-1", status)));
        AgentId::new("agt-1")
    }

    fn get(&self) -> deck_core::AgentRecord {
        self.store.get(&AgentId::new("agt-1")).unwrap()
    }
}

fn config() -> SyncConfig {
    SyncConfig {
        poll_interval_ms: 5_000,
        push_retry_ms: 2_000,
        stale_after_failures: 3,
        log_capacity: 0,
    }
}

/// Let spawned tasks run without crossing the next poll
async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn subscribe_polls_immediately_and_on_interval() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.backend.set_snapshot(AgentUpdate::new("agt-1").status(AgentStatus::Running).progress(30u8));

    h.manager.subscribe(&id).unwrap();
    settle().await;

    assert_eq!(h.backend.poll_count(&id), 1);
    assert_eq!(h.get().progress, 30);
    assert_eq!(h.manager.health(&id), SyncHealth::Live);

    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(h.backend.poll_count(&id), 2);
}

#[tokio::test(start_paused = true)]
async fn push_delivery_is_reconciled() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Queued);
    h.manager.subscribe(&id).unwrap();
    settle().await;

    let update = AgentUpdate::new("agt-1").status(AgentStatus::Running).progress(40u8);
    assert!(h.backend.push(update));
    settle().await;

    assert_eq!(h.get().status, AgentStatus::Running);
    assert_eq!(h.get().progress, 40);
}

#[tokio::test(start_paused = true)]
async fn stale_poll_after_push_keeps_fresher_state() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Queued);
    h.backend.set_snapshot(AgentUpdate::new("agt-1").status(AgentStatus::Queued));
    h.manager.subscribe(&id).unwrap();
    settle().await;

    h.backend.push(AgentUpdate::new("agt-1").status(AgentStatus::Running).progress(40u8));
    settle().await;
    // The backend's poll view lags behind and still says queued
    sleep(Duration::from_millis(5_000)).await;

    assert_eq!(h.backend.poll_count(&id), 2);
    let record = h.get();
    assert_eq!(record.status, AgentStatus::Running);
    assert_eq!(record.progress, 40);
}

#[tokio::test(start_paused = true)]
async fn dropped_push_degrades_then_reconnects() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.manager.subscribe(&id).unwrap();
    settle().await;
    assert_eq!(h.backend.subscribe_count(&id), 1);

    h.backend.disconnect(&id);
    settle().await;
    assert_eq!(h.manager.health(&id), SyncHealth::Degraded);

    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(h.backend.subscribe_count(&id), 2);
    assert_eq!(h.manager.health(&id), SyncHealth::Live);
    assert!(h.backend.is_push_open(&id));
}

#[tokio::test(start_paused = true)]
async fn unavailable_push_falls_back_to_polling() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.backend.set_push_unavailable(true);
    h.backend.set_snapshot(AgentUpdate::new("agt-1").progress(70u8));

    h.manager.subscribe(&id).unwrap();
    settle().await;

    assert_eq!(h.manager.health(&id), SyncHealth::Degraded);
    assert_eq!(h.get().progress, 70);
}

#[tokio::test(start_paused = true)]
async fn repeated_poll_failures_mark_data_stale() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.backend.fail_polls(true);
    h.manager.subscribe(&id).unwrap();
    settle().await;
    assert_eq!(h.manager.health(&id), SyncHealth::Live);

    // Polls at 5s and 10s fail too; no retry in between
    sleep(Duration::from_millis(10_000)).await;
    assert_eq!(h.backend.poll_count(&id), 3);
    assert_eq!(h.manager.health(&id), SyncHealth::Stale);

    h.backend.fail_polls(false);
    h.backend.set_snapshot(AgentUpdate::new("agt-1").status(AgentStatus::Running));
    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(h.manager.health(&id), SyncHealth::Live);
}

#[tokio::test(start_paused = true)]
async fn terminal_status_ends_the_subscription() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.manager.subscribe(&id).unwrap();
    settle().await;

    h.backend.push(AgentUpdate::new("agt-1").status(AgentStatus::Completed));
    settle().await;

    assert!(!h.manager.is_subscribed(&id));
    assert_eq!(h.manager.health(&id), SyncHealth::Unsubscribed);
    let polls = h.backend.poll_count(&id);
    sleep(Duration::from_millis(20_000)).await;
    assert_eq!(h.backend.poll_count(&id), polls);
}

#[tokio::test(start_paused = true)]
async fn unsubscribe_tears_down_push_and_poll() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.manager.subscribe(&id).unwrap();
    settle().await;

    assert!(h.manager.unsubscribe(&id));
    settle().await;

    assert!(!h.backend.is_push_open(&id));
    sleep(Duration::from_millis(20_000)).await;
    assert_eq!(h.backend.poll_count(&id), 1);
    // The agent itself is untouched
    assert_eq!(h.get().status, AgentStatus::Running);
    assert!(!h.manager.unsubscribe(&id));
}

#[tokio::test(start_paused = true)]
async fn subscribing_twice_keeps_one_stream() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.manager.subscribe(&id).unwrap();
    h.manager.subscribe(&id).unwrap();
    settle().await;

    assert_eq!(h.backend.subscribe_count(&id), 1);
    assert_eq!(h.manager.subscribed(), vec![id]);
}

#[tokio::test(start_paused = true)]
async fn untracked_or_finished_agents_are_not_subscribed() {
    let h = Harness::new();
    let err = h.manager.subscribe(&AgentId::new("agt-9")).unwrap_err();
    assert_eq!(err, CommandError::NotFound(AgentId::new("agt-9")));

    let id = h.seed(AgentStatus::Failed);
    h.manager.subscribe(&id).unwrap();
    settle().await;
    assert!(!h.manager.is_subscribed(&id));
    assert!(h.backend.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn removed_agent_stops_syncing() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.manager.subscribe(&id).unwrap();
    settle().await;

    h.store.write(|r| r.remove(&id));
    sleep(Duration::from_millis(5_000)).await;

    assert!(!h.manager.is_subscribed(&id));
    assert_eq!(h.backend.poll_count(&id), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_manager_cancels_every_subscription() {
    let h = Harness::new();
    let id = h.seed(AgentStatus::Running);
    h.manager.subscribe(&id).unwrap();
    settle().await;

    let Harness { manager, backend, .. } = h;
    drop(manager);
    settle().await;

    assert!(!backend.is_push_open(&id));
}
