// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-windowed agent statistics.

use chrono::{DateTime, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts over a window of days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub total: u64,
    pub completed: u64,
    pub failed: u64,
    pub queued: u64,
    pub avg_duration_minutes: f64,
    /// `YYYY-MM-DD` (UTC) → agents launched that day
    #[serde(default)]
    pub by_day: BTreeMap<String, u64>,
}

impl AgentStats {
    /// Fraction of agents that completed; 0 when there are none
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Make `by_day` cover exactly the `window_days` days ending today.
    ///
    /// Missing days are filled with zero and keys outside the window are
    /// dropped, so callers can rely on a dense, fixed-size histogram.
    pub fn normalize_window(mut self, window_days: u32, now_ms: u64) -> Self {
        let sparse = std::mem::take(&mut self.by_day);
        self.by_day = window_keys(window_days, now_ms)
            .into_iter()
            .map(|key| {
                let count = sparse.get(&key).copied().unwrap_or(0);
                (key, count)
            })
            .collect();
        self
    }
}

fn date_of(epoch_ms: u64) -> NaiveDate {
    DateTime::from_timestamp_millis(epoch_ms as i64).unwrap_or_default().date_naive()
}

/// UTC calendar day of a timestamp, as `YYYY-MM-DD`
pub fn day_key(epoch_ms: u64) -> String {
    date_of(epoch_ms).format("%Y-%m-%d").to_string()
}

/// Day keys of the `window_days` days ending on the day of `now_ms`, oldest first
pub fn window_keys(window_days: u32, now_ms: u64) -> Vec<String> {
    let today = date_of(now_ms);
    (0..window_days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .map(|day| day.format("%Y-%m-%d").to_string())
        .collect()
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
