// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counters for diagnosing push/poll disagreement

use super::{DiscardReason, ReconcileOutcome};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SyncDiagnostics {
    applied: AtomicU64,
    stale: AtomicU64,
    invalid_transition: AtomicU64,
    unknown_agent: AtomicU64,
}

/// Point-in-time copy of [`SyncDiagnostics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsSnapshot {
    pub applied: u64,
    pub stale: u64,
    pub invalid_transition: u64,
    pub unknown_agent: u64,
}

impl DiagnosticsSnapshot {
    pub fn discarded(&self) -> u64 {
        self.stale + self.invalid_transition + self.unknown_agent
    }
}

impl SyncDiagnostics {
    pub(crate) fn count(&self, outcome: &ReconcileOutcome) {
        let counter = match outcome {
            ReconcileOutcome::Applied => &self.applied,
            ReconcileOutcome::Discarded(DiscardReason::Stale) => &self.stale,
            ReconcileOutcome::Discarded(DiscardReason::InvalidTransition { .. }) => {
                &self.invalid_transition
            }
            ReconcileOutcome::Discarded(DiscardReason::UnknownAgent) => &self.unknown_agent,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            applied: self.applied.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            invalid_transition: self.invalid_transition.load(Ordering::Relaxed),
            unknown_agent: self.unknown_agent.load(Ordering::Relaxed),
        }
    }
}
