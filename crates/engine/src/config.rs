// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync tuning knobs.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// How subscriptions poll, reconnect, and retain logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Safety-net poll period while subscribed
    pub poll_interval_ms: u64,
    /// Delay before re-opening a dropped push stream
    pub push_retry_ms: u64,
    /// Consecutive failed polls before an agent is flagged stale
    pub stale_after_failures: u32,
    /// Retained log entries per agent (0 = unbounded)
    pub log_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            push_retry_ms: 2_000,
            stale_after_failures: 3,
            log_capacity: 5_000,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn push_retry(&self) -> Duration {
        Duration::from_millis(self.push_retry_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Zero("poll_interval_ms"));
        }
        if self.push_retry_ms == 0 {
            return Err(ConfigError::Zero("push_retry_ms"));
        }
        if self.stale_after_failures == 0 {
            return Err(ConfigError::Zero("stale_after_failures"));
        }
        Ok(())
    }
}
