// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent log entries and the append-only buffer that holds them.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
    Debug,
}

crate::simple_display! {
    LogLevel {
        Info => "info",
        Warning => "warning",
        Error => "error",
        Debug => "debug",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Epoch milliseconds
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp_ms: u64, level: LogLevel, message: impl Into<String>) -> Self {
        Self { timestamp_ms, level, message: message.into() }
    }
}

/// Ordered, append-only log buffer for one agent.
///
/// Entries are non-decreasing by timestamp. Nothing already present is ever
/// reordered; the only removal is eviction of the oldest entries once
/// `capacity` is exceeded (`0` means unbounded). Evictions are counted so
/// [`LogBuffer::total_len`] never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    #[serde(default)]
    evicted: u64,
    #[serde(default)]
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::new(), evicted: 0, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the retention bound, evicting immediately if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ever accepted, including those since evicted
    pub fn total_len(&self) -> u64 {
        self.evicted + self.entries.len() as u64
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.entries.back().map(|e| e.timestamp_ms)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    /// Whether any of `entries` would be appended
    pub fn has_newer(&self, entries: &[LogEntry]) -> bool {
        match self.last_timestamp() {
            Some(last) => entries.iter().any(|e| e.timestamp_ms > last),
            None => !entries.is_empty(),
        }
    }

    /// Append the entries strictly after the last known timestamp.
    ///
    /// The comparison is against the buffer as it was before this call, so a
    /// batch may contain several entries sharing one timestamp. The batch is
    /// stably sorted first to keep the buffer non-decreasing regardless of
    /// delivery order. Returns the number of entries appended.
    pub fn append_after(&mut self, entries: impl IntoIterator<Item = LogEntry>) -> usize {
        let last = self.last_timestamp();
        let mut fresh: Vec<LogEntry> = entries
            .into_iter()
            .filter(|e| last.map_or(true, |last| e.timestamp_ms > last))
            .collect();
        fresh.sort_by_key(|e| e.timestamp_ms);
        let appended = fresh.len();
        self.entries.extend(fresh);
        self.evict();
        appended
    }

    /// Up to `limit` entries in chronological order, ending at the newest
    /// entry strictly before `before` (or the newest entry overall).
    pub fn page(&self, limit: usize, before: Option<u64>) -> Vec<LogEntry> {
        let end = match before {
            Some(ts) => self.entries.partition_point(|e| e.timestamp_ms < ts),
            None => self.entries.len(),
        };
        let start = end.saturating_sub(limit);
        self.entries.range(start..end).cloned().collect()
    }

    fn evict(&mut self) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
