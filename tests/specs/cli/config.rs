// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file and environment handling

use crate::prelude::*;

#[test]
fn unparsable_config_is_reported() {
    cli_with_config("endpoint = ").args(&["list"]).exits_with(1).stderr_has("failed to parse");
}

#[test]
fn unknown_config_key_is_reported() {
    cli_with_config("endpont = \"http://x:1\"\n")
        .args(&["list"])
        .exits_with(1)
        .stderr_has("failed to parse");
}

#[test]
fn config_endpoint_is_used() {
    cli_with_config(&format!("endpoint = \"{UNREACHABLE}\"\n"))
        .args(&["list"])
        .exits_with(3)
        .stderr_has("connection failed");
}

#[test]
fn non_http_endpoint_is_refused() {
    cli()
        .env("DECK_ENDPOINT", "ftp://deck.example")
        .args(&["list"])
        .exits_with(1)
        .stderr_has("bad endpoint");
}

#[test]
fn zero_poll_interval_is_refused() {
    cli()
        .env("DECK_ENDPOINT", UNREACHABLE)
        .env("DECK_POLL_MS", "0")
        .args(&["list"])
        .exits_with(1)
        .stderr_has("poll_interval_ms");
}
