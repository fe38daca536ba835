// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let outcome = cli().args(&["--help"]).passes().stdout_has("Usage:");
    let outcome = ["launch", "pause", "resume", "cancel", "delete", "send", "clear"]
        .iter()
        .fold(outcome, |o, cmd| o.stdout_has(cmd));
    ["list", "show", "watch", "logs", "stats"].iter().fold(outcome, |o, cmd| o.stdout_has(cmd));
}

#[test]
fn launch_help_shows_options() {
    cli()
        .args(&["launch", "--help"])
        .passes()
        .stdout_has("--prompt")
        .stdout_has("--auto-branch")
        .stdout_has("--auto-pr")
        .stdout_has("--watch");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn clear_needs_a_target() {
    cli().args(&["clear"]).exits_with(2).stderr_has("--completed");
}
