// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket push bridge: subscribes to the backend's per-agent event
//! stream and forwards each decoded update over an mpsc channel.
//!
//! Every text frame is one JSON [`AgentUpdate`]. The bridge task ends when
//! the stream closes or errors (closing the channel, which the subscriber
//! sees as a disconnect) or when the subscriber drops its receiver.

use crate::transport::{PushTransport, TransportError};
use async_trait::async_trait;
use deck_core::{AgentId, AgentUpdate};
use deck_wire::route;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

const CHANNEL_CAPACITY: usize = 64;

/// Push transport over the backend's WebSocket endpoint
#[derive(Debug, Clone)]
pub struct WsPush {
    base: String,
    token: Option<String>,
}

type EventStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

impl WsPush {
    /// `base` is a `ws://` or `wss://` URL, path included, that event routes
    /// are appended to
    pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, token }
    }

    async fn connect(&self, id: &AgentId) -> Result<EventStream, TransportError> {
        let uri = format!("{}{}", self.base, route::events(id));
        let mut request = uri
            .into_client_request()
            .map_err(|e| TransportError::Protocol(format!("bad ws request: {e}")))?;
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| TransportError::Protocol(format!("bad token: {e}")))?;
            request.headers_mut().insert("Authorization", value);
        }

        match tokio_tungstenite::connect_async(request).await {
            Ok((ws, _)) => Ok(ws),
            Err(WsError::Io(e)) => {
                Err(TransportError::Connection(format!("TCP connect failed: {e}")))
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "ws connect: WebSocket handshake failed");
                Err(TransportError::Connection(format!("handshake failed: {e}")))
            }
        }
    }
}

#[async_trait]
impl PushTransport for WsPush {
    async fn subscribe(&self, id: &AgentId) -> Result<mpsc::Receiver<AgentUpdate>, TransportError> {
        let ws = self.connect(id).await?;
        tracing::info!(%id, "ws bridge connected");
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(event_bridge(ws, id.clone(), tx));
        Ok(rx)
    }
}

async fn event_bridge(ws: EventStream, id: AgentId, tx: mpsc::Sender<AgentUpdate>) {
    let (_, mut read) = ws.split();
    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(update) = parse_frame(&text, &id) {
                            if tx.send(update).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(%id, ?frame, "ws bridge: received close frame");
                        break;
                    }
                    None => {
                        tracing::info!(%id, "ws bridge: stream ended");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(%id, error = %e, "ws bridge: error");
                        break;
                    }
                    _ => {} // Ping/Pong/Binary
                }
            }
            _ = tx.closed() => {
                tracing::debug!(%id, "ws bridge: subscriber gone");
                break;
            }
        }
    }
}

/// Decode one text frame. Frames that fail to parse or name another agent
/// are dropped.
pub(crate) fn parse_frame(text: &str, id: &AgentId) -> Option<AgentUpdate> {
    let update: AgentUpdate = match serde_json::from_str(text) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(%id, error = %e, "ws bridge: undecodable frame");
            return None;
        }
    };
    if update.id != *id {
        tracing::warn!(%id, other = %update.id, "ws bridge: frame for another agent");
        return None;
    }
    Some(update)
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
