// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request bodies sent to the agent backend.
//!
//! Launch requests reuse [`deck_core::LaunchConfig`] directly; pause,
//! resume, cancel and delete carry no body.

use deck_core::AgentId;
use serde::{Deserialize, Serialize};

/// Operator message delivered to a live agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterveneRequest {
    pub message: String,
}

/// Remove several terminal agents in one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteManyRequest {
    pub ids: Vec<AgentId>,
}
