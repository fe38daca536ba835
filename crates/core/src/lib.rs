// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! deck-core: data model for tracking background coding agents

pub mod macros;

pub mod agent;
pub mod agent_record;
pub mod clock;
pub mod id;
pub mod launch;
pub mod log;
pub mod stats;
pub mod task;
pub mod time_fmt;
pub mod update;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{Action, AgentStatus, UnknownStatus};
#[cfg(any(test, feature = "test-support"))]
pub use agent_record::AgentRecordBuilder;
pub use agent_record::{AgentRecord, SnapshotError};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{short, AgentId, TaskId};
pub use launch::LaunchConfig;
pub use log::{LogBuffer, LogEntry, LogLevel};
pub use stats::{day_key, window_keys, AgentStats};
pub use task::{compute_progress, expanded_task_ids, TaskNode, TaskStatus};
pub use time_fmt::{format_duration_ms, format_elapsed};
pub use update::AgentUpdate;
