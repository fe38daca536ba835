// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query parameters for paged log reads.

use serde::{Deserialize, Serialize};

/// Page size used when a caller does not pick one
pub const DEFAULT_LOG_LIMIT: usize = 200;

/// One page of log history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    /// Maximum number of entries to return
    pub limit: usize,
    /// Only entries strictly older than this timestamp (epoch ms).
    /// `None` asks for the newest page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<u64>,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self { limit: DEFAULT_LOG_LIMIT, before: None }
    }
}

impl LogQuery {
    pub fn latest(limit: usize) -> Self {
        Self { limit, before: None }
    }

    pub fn before(limit: usize, before: u64) -> Self {
        Self { limit, before: Some(before) }
    }

    /// Whether this page reaches the live end of the stream
    pub fn is_latest(&self) -> bool {
        self.before.is_none()
    }

    /// `limit=50&before=1700000000000`
    pub fn to_query_string(&self) -> String {
        match self.before {
            Some(before) => format!("limit={}&before={}", self.limit, before),
            None => format!("limit={}", self.limit),
        }
    }

    /// Parse a query string produced by [`LogQuery::to_query_string`].
    ///
    /// Unknown keys are ignored; a missing `limit` falls back to the default.
    pub fn from_query_string(query: &str) -> Option<Self> {
        let mut parsed = Self::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=')?;
            match key {
                "limit" => parsed.limit = value.parse().ok()?,
                "before" => parsed.before = Some(value.parse().ok()?),
                _ => {}
            }
        }
        Some(parsed)
    }
}
