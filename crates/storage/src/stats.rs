// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stats derived from tracked records, for when the backend's stats
//! endpoint is unavailable.

use crate::Registry;
use deck_core::{day_key, window_keys, AgentStats, AgentStatus};
use std::collections::HashSet;

impl Registry {
    /// Aggregate the agents launched within the `window_days` days ending on
    /// the day of `now_ms`. `by_day` covers every day of the window.
    pub fn stats(&self, window_days: u32, now_ms: u64) -> AgentStats {
        let days: HashSet<String> = window_keys(window_days, now_ms).into_iter().collect();
        let mut stats = AgentStats::default();
        let mut durations_ms: Vec<u64> = Vec::new();

        for record in self.records.values() {
            let day = day_key(record.created_at_ms);
            if !days.contains(&day) {
                continue;
            }
            stats.total += 1;
            *stats.by_day.entry(day).or_insert(0) += 1;
            match record.status {
                AgentStatus::Completed => {
                    stats.completed += 1;
                    durations_ms.extend(record.duration_ms());
                }
                AgentStatus::Failed => stats.failed += 1,
                AgentStatus::Queued => stats.queued += 1,
                AgentStatus::Running | AgentStatus::Paused => {}
            }
        }

        if !durations_ms.is_empty() {
            let sum: u64 = durations_ms.iter().sum();
            stats.avg_duration_minutes = sum as f64 / durations_ms.len() as f64 / 60_000.0;
        }
        stats.normalize_window(window_days, now_ms)
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
