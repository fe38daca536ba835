// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch-time configuration of a background agent

use serde::{Deserialize, Serialize};

/// Configuration submitted when launching an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfig {
    pub name: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Create a working branch for the agent's changes
    #[serde(default)]
    pub auto_branch: bool,
    /// Open a pull request when the agent completes
    #[serde(default)]
    pub auto_pr: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    /// Wall-clock limit; 0 = unlimited
    #[serde(default)]
    pub max_duration_minutes: u32,
}

impl LaunchConfig {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            profile_id: None,
            project_id: None,
            auto_branch: false,
            auto_pr: false,
            base_branch: None,
            max_duration_minutes: 0,
        }
    }

    crate::setters! {
        set {
            auto_branch: bool,
            auto_pr: bool,
            max_duration_minutes: u32,
        }
        option {
            profile_id: String,
            project_id: String,
            base_branch: String,
        }
    }

    /// Check the fields that must be present before anything is sent.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("agent name is required".to_string());
        }
        if self.prompt.trim().is_empty() {
            return Err("prompt is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        empty_name   = { "",    "fix the build", "agent name is required" },
        blank_name   = { "  ",  "fix the build", "agent name is required" },
        empty_prompt = { "fix", "",              "prompt is required" },
        blank_prompt = { "fix", "\n\t",          "prompt is required" },
    )]
    fn missing_fields_rejected(name: &str, prompt: &str, reason: &str) {
        assert_eq!(LaunchConfig::new(name, prompt).validate(), Err(reason.to_string()));
    }

    #[test]
    fn serializes_camel_case_and_skips_unset_options() {
        let config = LaunchConfig::new("fixer", "fix it")
            .auto_branch(true)
            .auto_pr(true)
            .base_branch("main")
            .max_duration_minutes(30);
        assert!(config.validate().is_ok());

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "fixer",
                "prompt": "fix it",
                "autoBranch": true,
                "autoPr": true,
                "baseBranch": "main",
                "maxDurationMinutes": 30,
            })
        );
    }
}
