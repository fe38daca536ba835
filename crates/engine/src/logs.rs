// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Paged log history and live log appends.

use crate::error::CommandError;
use crate::reconcile::Reconciler;
use deck_adapters::{PollTransport, TransportError};
use deck_core::{AgentId, Clock, LogEntry};
use deck_wire::LogQuery;

#[derive(Clone)]
pub struct LogStore<B: PollTransport, C: Clock> {
    backend: B,
    reconciler: Reconciler<C>,
}

impl<B: PollTransport, C: Clock> LogStore<B, C> {
    pub fn new(backend: B, reconciler: Reconciler<C>) -> Self {
        Self { backend, reconciler }
    }

    /// Fetch one page of history, oldest entry first.
    ///
    /// The newest page also feeds the agent's buffer, keeping only entries
    /// after the last one it holds. Older pages go to the caller only.
    pub async fn fetch_logs(
        &self,
        id: &AgentId,
        query: LogQuery,
    ) -> Result<Vec<LogEntry>, CommandError> {
        let mut entries = self.backend.fetch_logs(id, query).await.map_err(|e| match e {
            TransportError::NotFound(_) => CommandError::NotFound(id.clone()),
            other => CommandError::from(other),
        })?;
        entries.sort_by_key(|e| e.timestamp_ms);

        if query.is_latest() {
            let appended = self.reconciler.append_logs(id, entries.clone());
            tracing::debug!(%id, fetched = entries.len(), appended, "latest log page merged");
        }
        Ok(entries)
    }

    /// Append entries delivered live; returns how many were new
    pub fn append_live(&self, id: &AgentId, entries: Vec<LogEntry>) -> usize {
        self.reconciler.append_logs(id, entries)
    }

    /// Serve a page from the in-memory buffer, with the same paging rules
    /// as [`LogStore::fetch_logs`]. `None` if the agent is not tracked.
    pub fn page(&self, id: &AgentId, query: LogQuery) -> Option<Vec<LogEntry>> {
        self.reconciler
            .store()
            .read(|registry| registry.get(id).map(|r| r.logs.page(query.limit, query.before)))
    }
}
