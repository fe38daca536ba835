// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent sync: a push listener plus a safety-net poll timer.
//!
//! Subscriptions follow the agent, not any view of it: one stays up until
//! it is explicitly dropped, the agent reaches a terminal status, or the
//! agent stops being tracked. The poll never stops while subscribed, since
//! push delivery may drop or duplicate updates.
//!
//! | event                      | health after                     |
//! |----------------------------|----------------------------------|
//! | subscribe, push connects   | `Live`                           |
//! | push stream ends / refused | `Degraded` (retry after a delay) |
//! | N consecutive poll errors  | `Stale`                          |
//! | successful poll or push    | `Live` or `Degraded`             |

use crate::config::SyncConfig;
use crate::error::CommandError;
use crate::reconcile::{Reconciler, UpdateSource};
use deck_adapters::{PollTransport, PushTransport};
use deck_core::{AgentId, AgentUpdate, Clock};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::future::{pending, Future};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncHealth {
    Unsubscribed,
    /// Push connected and polls succeeding
    Live,
    /// Push down; polling only
    Degraded,
    /// Polls keep failing; shown data may be out of date
    Stale,
}

deck_core::simple_display! {
    SyncHealth {
        Unsubscribed => "unsubscribed",
        Live => "live",
        Degraded => "degraded",
        Stale => "stale",
    }
}

struct Subscription {
    generation: u64,
    token: CancellationToken,
    health: SyncHealth,
}

#[derive(Default)]
struct Subscriptions {
    active: HashMap<AgentId, Subscription>,
    next_generation: u64,
}

pub struct SubscriptionManager<B: PollTransport, P: PushTransport, C: Clock> {
    poll: B,
    push: P,
    reconciler: Reconciler<C>,
    config: SyncConfig,
    subs: Arc<Mutex<Subscriptions>>,
    root: CancellationToken,
}

impl<B: PollTransport, P: PushTransport, C: Clock> SubscriptionManager<B, P, C> {
    pub fn new(poll: B, push: P, reconciler: Reconciler<C>, config: SyncConfig) -> Self {
        Self {
            poll,
            push,
            reconciler,
            config,
            subs: Arc::new(Mutex::new(Subscriptions::default())),
            root: CancellationToken::new(),
        }
    }

    /// Start syncing `id`. Must be called from within a Tokio runtime.
    ///
    /// Subscribing twice is a no-op, as is subscribing to an agent that has
    /// already finished.
    pub fn subscribe(&self, id: &AgentId) -> Result<(), CommandError> {
        let status = self
            .reconciler
            .store()
            .read(|registry| registry.get(id).map(|record| record.status))
            .ok_or_else(|| CommandError::NotFound(id.clone()))?;
        if status.is_terminal() {
            tracing::debug!(%id, %status, "agent finished, not subscribing");
            return Ok(());
        }

        let (generation, token) = {
            let mut subs = self.subs.lock();
            if subs.active.contains_key(id) {
                return Ok(());
            }
            subs.next_generation += 1;
            let generation = subs.next_generation;
            let token = self.root.child_token();
            subs.active.insert(
                id.clone(),
                Subscription { generation, token: token.clone(), health: SyncHealth::Live },
            );
            (generation, token)
        };

        let worker = AgentSync {
            id: id.clone(),
            generation,
            token,
            poll: self.poll.clone(),
            push: self.push.clone(),
            reconciler: self.reconciler.clone(),
            config: self.config.clone(),
            subs: Arc::clone(&self.subs),
        };
        tokio::spawn(worker.run());
        tracing::info!(%id, "subscribed");
        Ok(())
    }

    /// Stop syncing `id`. The agent itself keeps running.
    pub fn unsubscribe(&self, id: &AgentId) -> bool {
        let Some(sub) = self.subs.lock().active.remove(id) else {
            return false;
        };
        sub.token.cancel();
        tracing::info!(%id, "unsubscribed");
        true
    }

    pub fn health(&self, id: &AgentId) -> SyncHealth {
        self.subs.lock().active.get(id).map_or(SyncHealth::Unsubscribed, |sub| sub.health)
    }

    pub fn is_subscribed(&self, id: &AgentId) -> bool {
        self.subs.lock().active.contains_key(id)
    }

    pub fn subscribed(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.subs.lock().active.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl<B: PollTransport, P: PushTransport, C: Clock> Drop for SubscriptionManager<B, P, C> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

/// The task behind one subscription
struct AgentSync<B: PollTransport, P: PushTransport, C: Clock> {
    id: AgentId,
    generation: u64,
    token: CancellationToken,
    poll: B,
    push: P,
    reconciler: Reconciler<C>,
    config: SyncConfig,
    subs: Arc<Mutex<Subscriptions>>,
}

impl<B: PollTransport, P: PushTransport, C: Clock> AgentSync<B, P, C> {
    async fn run(self) {
        let retry = self.config.push_retry();
        let mut stream = self.connect().await;
        let mut retry_at = stream.is_none().then(|| Instant::now() + retry);
        let mut failures: u32 = 0;
        self.update_health(stream.is_some(), failures);

        let mut poll = tokio::time::interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.token.cancelled() => break,

                update = next_push(&mut stream) => match update {
                    Some(update) => {
                        failures = 0;
                        self.reconciler.apply(update, UpdateSource::Push);
                    }
                    None => {
                        tracing::warn!(id = %self.id, "push stream closed, polling only");
                        stream = None;
                        retry_at = Some(Instant::now() + retry);
                    }
                },

                _ = retry_timer(retry_at) => {
                    stream = self.connect().await;
                    retry_at = stream.is_none().then(|| Instant::now() + retry);
                }

                _ = poll.tick() => {
                    let Some(result) = self.until_cancelled(self.poll.fetch_agent(&self.id)).await
                    else {
                        break;
                    };
                    match result {
                        Ok(update) => {
                            failures = 0;
                            self.reconciler.apply(update, UpdateSource::Poll);
                        }
                        Err(e) => {
                            failures = failures.saturating_add(1);
                            tracing::debug!(id = %self.id, failures, error = %e, "poll failed");
                        }
                    }
                }
            }

            if self.finished() {
                break;
            }
            self.update_health(stream.is_some(), failures);
        }
        self.release();
    }

    async fn connect(&self) -> Option<mpsc::Receiver<AgentUpdate>> {
        match self.until_cancelled(self.push.subscribe(&self.id)).await? {
            Ok(rx) => {
                tracing::debug!(id = %self.id, "push stream open");
                Some(rx)
            }
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "push unavailable, polling only");
                None
            }
        }
    }

    async fn until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => Some(output),
        }
    }

    /// Terminal or no longer tracked: nothing left to sync
    fn finished(&self) -> bool {
        self.reconciler
            .store()
            .read(|registry| registry.get(&self.id).map_or(true, |record| record.is_terminal()))
    }

    fn update_health(&self, push_open: bool, failures: u32) {
        let health = if failures >= self.config.stale_after_failures {
            SyncHealth::Stale
        } else if push_open {
            SyncHealth::Live
        } else {
            SyncHealth::Degraded
        };

        let previous = {
            let mut subs = self.subs.lock();
            match subs.active.get_mut(&self.id) {
                Some(sub) if sub.generation == self.generation => {
                    std::mem::replace(&mut sub.health, health)
                }
                _ => return,
            }
        };
        if previous == health {
            return;
        }
        match health {
            SyncHealth::Stale => {
                tracing::warn!(id = %self.id, failures, "agent data is stale");
            }
            _ => tracing::info!(id = %self.id, from = %previous, to = %health, "sync health"),
        }
    }

    fn release(&self) {
        let mut subs = self.subs.lock();
        if subs.active.get(&self.id).is_some_and(|sub| sub.generation == self.generation) {
            subs.active.remove(&self.id);
            tracing::info!(id = %self.id, "subscription ended");
        }
    }
}

async fn next_push(stream: &mut Option<mpsc::Receiver<AgentUpdate>>) -> Option<AgentUpdate> {
    match stream {
        Some(rx) => rx.recv().await,
        None => pending().await,
    }
}

async fn retry_timer(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
