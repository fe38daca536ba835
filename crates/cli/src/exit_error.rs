// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use deck_engine::CommandError;
use std::fmt;

pub mod codes {
    /// Anything not classified below
    pub const FAILURE: i32 = 1;
    /// The command was refused; nothing changed
    pub const REJECTED: i32 = 2;
    /// The backend could not be reached or answered garbage; the command
    /// may or may not have taken effect
    pub const OUTCOME_UNKNOWN: i32 = 3;
    /// Interrupted by Ctrl-C
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn not_found(id: &str) -> Self {
        Self::new(codes::REJECTED, format!("agent not found: {id}"))
    }
}

impl From<CommandError> for ExitError {
    fn from(err: CommandError) -> Self {
        let code = if err.is_outcome_unknown() { codes::OUTCOME_UNKNOWN } else { codes::REJECTED };
        Self::new(code, err.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
