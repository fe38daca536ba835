// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// CLI version with the build's git hash
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

/// Resolve the config file: DECK_CONFIG > <config dir>/deck/config.toml
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("DECK_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("deck").join("config.toml"))
}

/// Backend endpoint override
pub fn endpoint() -> Option<String> {
    std::env::var("DECK_ENDPOINT").ok().filter(|s| !s.is_empty())
}

/// Bearer token override
pub fn token() -> Option<String> {
    std::env::var("DECK_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Poll interval override in milliseconds
pub fn poll_ms() -> Option<u64> {
    std::env::var("DECK_POLL_MS").ok().and_then(|s| s.parse::<u64>().ok())
}

/// Per-agent log capacity override
pub fn log_capacity() -> Option<usize> {
    std::env::var("DECK_LOG_CAPACITY").ok().and_then(|s| s.parse::<usize>().ok())
}

/// Log filter directives, e.g. `deck_engine=debug`
pub fn log_filter() -> String {
    std::env::var("DECK_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "warn".into())
}
