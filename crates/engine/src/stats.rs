// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-windowed stats, from the backend or from tracked records.

use crate::error::CommandError;
use crate::store::Store;
use deck_adapters::StatsTransport;
use deck_core::{AgentStats, Clock};

#[derive(Clone)]
pub struct StatsAggregator<B: StatsTransport, C: Clock> {
    backend: B,
    store: Store,
    clock: C,
}

impl<B: StatsTransport, C: Clock> StatsAggregator<B, C> {
    pub fn new(backend: B, store: Store, clock: C) -> Self {
        Self { backend, store, clock }
    }

    /// Backend stats for the last `window_days` days (at least one), with
    /// `by_day` filled in for every day of the window
    pub async fn fetch_stats(&self, window_days: u32) -> Result<AgentStats, CommandError> {
        let window_days = window_days.max(1);
        let stats = self.backend.fetch_stats(window_days).await?;
        Ok(stats.normalize_window(window_days, self.clock.epoch_ms()))
    }

    /// The same shape derived from tracked records only
    pub fn local_stats(&self, window_days: u32) -> AgentStats {
        let now_ms = self.clock.epoch_ms();
        self.store.read(|registry| registry.stats(window_days.max(1), now_ms))
    }
}
