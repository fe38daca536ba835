// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a `deck` invocation isolated from the user's config and
//! environment, with fluent assertions on its outcome.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Nothing listens here; connects are refused immediately
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub struct Deck {
    cmd: Command,
    _home: TempDir,
}

/// A `deck` command whose config file does not exist
pub fn cli() -> Deck {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("config.toml");
    with_config(home, &config)
}

/// A `deck` command reading `contents` as its config file
pub fn cli_with_config(contents: &str) -> Deck {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(&config, contents).unwrap();
    with_config(home, &config)
}

fn with_config(home: TempDir, config: &Path) -> Deck {
    let mut cmd = Command::cargo_bin("deck").unwrap();
    cmd.env("DECK_CONFIG", config)
        .env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("DECK_ENDPOINT")
        .env_remove("DECK_TOKEN")
        .env_remove("DECK_POLL_MS")
        .env_remove("DECK_LOG_CAPACITY")
        .env_remove("DECK_LOG");
    Deck { cmd, _home: home }
}

impl Deck {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Outcome {
        let output = self.cmd.output().unwrap();
        assert!(output.status.success(), "expected success, got {output:?}");
        Outcome::new(output)
    }

    pub fn exits_with(mut self, code: i32) -> Outcome {
        let output = self.cmd.output().unwrap();
        assert_eq!(output.status.code(), Some(code), "unexpected exit: {output:?}");
        Outcome::new(output)
    }
}

pub struct Outcome {
    stdout: String,
    stderr: String,
}

impl Outcome {
    fn new(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}:\n{}", self.stderr);
        self
    }
}
