// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit codes: 2 when a command is refused, 3 when its outcome is unknown

use crate::prelude::*;

#[test]
fn launch_without_name_is_rejected_before_contacting_the_backend() {
    cli()
        .env("DECK_ENDPOINT", UNREACHABLE)
        .args(&["launch", "", "--prompt", "fix the build"])
        .exits_with(2)
        .stderr_has("agent name is required");
}

#[test]
fn launch_without_prompt_is_rejected() {
    cli()
        .env("DECK_ENDPOINT", UNREACHABLE)
        .args(&["launch", "fixer", "--prompt", "  "])
        .exits_with(2)
        .stderr_has("prompt is required");
}

#[test]
fn unreachable_backend_leaves_outcome_unknown() {
    cli()
        .env("DECK_ENDPOINT", UNREACHABLE)
        .args(&["launch", "fixer", "--prompt", "fix the build"])
        .exits_with(3)
        .stderr_has("connection failed");
}

#[test]
fn listing_needs_the_backend() {
    cli().env("DECK_ENDPOINT", UNREACHABLE).args(&["list"]).exits_with(3);
}

#[test]
fn commands_on_agents_hydrate_first() {
    cli().env("DECK_ENDPOINT", UNREACHABLE).args(&["pause", "agt-1"]).exits_with(3);
}
