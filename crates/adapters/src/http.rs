// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the agent backend's JSON API.
//!
//! Routes are joined onto the endpoint's base URL, path included, so a
//! backend mounted under `/v1` is reached at `/v1/api/agents`. Every request
//! carries the bearer token when one is configured and is bounded by a
//! single timeout covering connect, send and body read.

use crate::transport::{CommandTransport, PollTransport, StatsTransport, TransportError};
use async_trait::async_trait;
use deck_core::{Action, AgentId, AgentStats, AgentUpdate, LaunchConfig, LogEntry};
use deck_wire::{
    decode, reason, route, AgentList, DeleteManyRequest, ErrorBody, InterveneRequest, LogPage,
    LogQuery,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Request/response transport over the backend's HTTP API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpBackend {
    /// Accepts `http(s)://host[:port][/base]` or a bare `host:port`.
    pub fn from_endpoint(endpoint: &str) -> Result<Self, TransportError> {
        let base = parse_endpoint(endpoint)?;
        let http = Client::builder()
            .build()
            .map_err(|e| TransportError::Connection(format!("http client init failed: {e}")))?;
        Ok(Self { http, base, token: None, timeout: DEFAULT_TIMEOUT })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Bound on connect + send + read of a single request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// The same base with the scheme switched to `ws`/`wss`
    pub fn push_url(&self) -> String {
        let base = self.base_url();
        match base.strip_prefix("https://") {
            Some(rest) => format!("wss://{rest}"),
            None => format!("ws://{}", base.strip_prefix("http://").unwrap_or(base)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.timeout(self.timeout);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.send(path, self.request(self.http.get(self.url(path)))).await
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&T>,
    ) -> Result<Vec<u8>, TransportError> {
        let builder = self.request(self.http.post(self.url(path)));
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(path, builder).await
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> Result<Vec<u8>, TransportError> {
        tracing::debug!(base = self.base_url(), path, "http request");
        let response = builder.send().await.map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(request_error)?;
        if status >= 400 {
            let err = status_error(status, &String::from_utf8_lossy(&body));
            tracing::debug!(path, status, error = %err, "http request failed");
            return Err(err);
        }
        Ok(body.to_vec())
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, TransportError> {
    let with_scheme = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    };
    let url = Url::parse(&with_scheme)
        .map_err(|e| TransportError::Connection(format!("bad endpoint {endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::Connection(format!(
            "unsupported scheme {}: {endpoint}",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(TransportError::Connection("endpoint has no host".into()));
    }
    if url.query().is_some() {
        return Err(TransportError::Connection(format!("endpoint has a query: {endpoint}")));
    }
    Ok(url)
}

fn request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() || e.is_decode() {
        TransportError::Protocol(e.to_string())
    } else {
        TransportError::Connection(e.to_string())
    }
}

/// Map a non-2xx response onto the transport error taxonomy.
///
/// 4xx means the backend refused the request; 5xx leaves the outcome unknown.
pub(crate) fn status_error(status: u16, body: &str) -> TransportError {
    match (status, ErrorBody::parse(body)) {
        (_, Some(err)) if err.reason == reason::NOT_FOUND => TransportError::NotFound(err.message),
        (404, _) => TransportError::NotFound(body.trim().to_string()),
        (400..=499, Some(err)) => {
            TransportError::Rejected { reason: err.reason, message: err.message }
        }
        (400..=499, None) => TransportError::rejected(format!("http_{status}"), body.trim()),
        _ => TransportError::Protocol(format!("HTTP {status}: {}", body.trim())),
    }
}

#[async_trait]
impl CommandTransport for HttpBackend {
    async fn launch(&self, config: &LaunchConfig) -> Result<AgentUpdate, TransportError> {
        let body = self.post(route::AGENTS, Some(config)).await?;
        Ok(decode(&body)?)
    }

    async fn act(
        &self,
        id: &AgentId,
        action: Action,
    ) -> Result<Option<AgentUpdate>, TransportError> {
        let body = self.post::<()>(&route::action(id, action), None).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(decode(&body)?))
    }

    async fn intervene(&self, id: &AgentId, message: &str) -> Result<(), TransportError> {
        let request = InterveneRequest { message: message.to_string() };
        self.post(&route::action(id, Action::Intervene), Some(&request)).await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[AgentId]) -> Result<(), TransportError> {
        let request = DeleteManyRequest { ids: ids.to_vec() };
        self.post(route::DELETE_MANY, Some(&request)).await?;
        Ok(())
    }

    async fn list_agents(&self) -> Result<Vec<AgentUpdate>, TransportError> {
        let list: AgentList = decode(&self.get(route::AGENTS).await?)?;
        Ok(list.agents)
    }
}

#[async_trait]
impl PollTransport for HttpBackend {
    async fn fetch_agent(&self, id: &AgentId) -> Result<AgentUpdate, TransportError> {
        Ok(decode(&self.get(&route::agent(id)).await?)?)
    }

    async fn fetch_logs(
        &self,
        id: &AgentId,
        query: LogQuery,
    ) -> Result<Vec<LogEntry>, TransportError> {
        let page: LogPage = decode(&self.get(&route::logs(id, &query)).await?)?;
        Ok(page.logs)
    }
}

#[async_trait]
impl StatsTransport for HttpBackend {
    async fn fetch_stats(&self, window_days: u32) -> Result<AgentStats, TransportError> {
        Ok(decode(&self.get(&route::stats(window_days)).await?)?)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
