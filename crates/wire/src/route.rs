// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request paths of the agent backend.

use crate::LogQuery;
use deck_core::{Action, AgentId};

pub const AGENTS: &str = "/api/agents";
pub const DELETE_MANY: &str = "/api/agents/delete";

/// `GET` full snapshot
pub fn agent(id: &AgentId) -> String {
    format!("{AGENTS}/{}", segment(id.as_str()))
}

/// `POST` an imperative command (`pause`, `resume`, `cancel`, `delete`, `intervene`)
pub fn action(id: &AgentId, action: Action) -> String {
    format!("{}/{action}", agent(id))
}

pub fn logs(id: &AgentId, query: &LogQuery) -> String {
    format!("{}/logs?{}", agent(id), query.to_query_string())
}

/// WebSocket upgrade path for live updates
pub fn events(id: &AgentId) -> String {
    format!("{}/events", agent(id))
}

pub fn stats(window_days: u32) -> String {
    format!("/api/stats?days={window_days}")
}

/// Percent-encode everything outside the RFC 3986 unreserved set
fn segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
