// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! deck-engine: keeps tracked agents in sync with the backend.
//!
//! Every write to the registry funnels through the [`Reconciler`], whether
//! it comes from a push delivery, a poll, a command response or hydration.
//! The [`Deck`] facade wires the pieces together for callers.

mod config;
mod deck;
mod error;
mod gateway;
mod logs;
mod pending;
mod reconcile;
mod stats;
mod store;
mod subscription;

pub use config::{ConfigError, SyncConfig};
pub use deck::Deck;
pub use error::CommandError;
pub use gateway::CommandGateway;
pub use logs::LogStore;
pub use pending::PendingActions;
pub use reconcile::{
    DiagnosticsSnapshot, DiscardReason, ReconcileOutcome, Reconciler, SyncDiagnostics,
    UpdateSource,
};
pub use stats::StatsAggregator;
pub use store::Store;
pub use subscription::{SubscriptionManager, SyncHealth};
