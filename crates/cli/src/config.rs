// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration: a TOML file plus environment overrides.
//!
//! ```toml
//! endpoint = "http://127.0.0.1:8420"
//! token = "…"
//!
//! [sync]
//! poll_interval_ms = 5000
//! log_capacity = 5000
//! ```

use crate::env;
use deck_engine::{ConfigError, SyncConfig};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8420";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub sync: SyncConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.to_string(), token: None, sync: SyncConfig::default() }
    }
}

impl DeckConfig {
    /// Load from the resolved config path, then apply `DECK_*` overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides();
        config.sync.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.message().to_string(),
        })
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(endpoint) = env::endpoint() {
            self.endpoint = endpoint;
        }
        if let Some(token) = env::token() {
            self.token = Some(token);
        }
        if let Some(ms) = env::poll_ms() {
            self.sync.poll_interval_ms = ms;
        }
        if let Some(capacity) = env::log_capacity() {
            self.sync.log_capacity = capacity;
        }
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
