// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring the engine to the bundled HTTP and WebSocket transports.

use anyhow::Result;
use deck_adapters::{HttpBackend, WsPush};
use deck_core::{AgentId, SystemClock};
use deck_engine::Deck;

use crate::config::DeckConfig;
use crate::exit_error::{codes, ExitError};

pub type Client = Deck<HttpBackend, WsPush, SystemClock>;

pub fn connect(config: &DeckConfig) -> Result<Client> {
    let backend = HttpBackend::from_endpoint(&config.endpoint)
        .map_err(|e| ExitError::new(codes::FAILURE, format!("bad endpoint: {e}")))?
        .with_token(config.token.clone());
    let push = WsPush::new(backend.push_url(), config.token.clone());
    tracing::debug!(endpoint = backend.base_url(), "connecting");
    Ok(Deck::new(backend, push, SystemClock, config.sync.clone())?)
}

/// Hydrate from the backend, then look up `id_or_prefix`
pub async fn resolve(client: &Client, id_or_prefix: &str) -> Result<AgentId> {
    client.load_agents().await?;
    match client.find(id_or_prefix) {
        Some(record) => Ok(record.id),
        None => Err(ExitError::not_found(id_or_prefix).into()),
    }
}
