// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

mod agent;
mod display;
mod stats;

use anyhow::Result;
use clap::{ArgGroup, Subcommand};
use deck_core::AgentStatus;

use crate::client::Client;
use crate::output::OutputFormat;

#[derive(Subcommand)]
pub enum Command {
    /// Launch a new background agent
    Launch {
        /// Display name for the agent
        name: String,
        /// Task description handed to the agent
        #[arg(long, short)]
        prompt: String,
        /// Agent profile to run with
        #[arg(long)]
        profile: Option<String>,
        /// Project the agent works in
        #[arg(long)]
        project: Option<String>,
        /// Create a working branch for the agent
        #[arg(long)]
        auto_branch: bool,
        /// Open a pull request when the agent finishes
        #[arg(long)]
        auto_pr: bool,
        /// Branch to start from
        #[arg(long)]
        base_branch: Option<String>,
        /// Wall-clock limit in minutes (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_minutes: u32,
        /// Follow the agent until it finishes
        #[arg(long, short)]
        watch: bool,
    },
    /// Pause a running agent
    Pause {
        /// Agent ID (or prefix)
        id: String,
    },
    /// Resume a paused agent
    Resume {
        /// Agent ID (or prefix)
        id: String,
    },
    /// Cancel an agent; it ends as failed
    Cancel {
        /// Agent ID (or prefix)
        id: String,
    },
    /// Delete a finished agent
    Delete {
        /// Agent ID (or prefix)
        id: String,
    },
    /// Send a message to a running or paused agent
    Send {
        /// Agent ID (or prefix)
        id: String,
        /// Message to send
        message: String,
    },
    /// Delete every completed or every failed agent
    #[command(group(ArgGroup::new("which").required(true).args(["completed", "failed"])))]
    Clear {
        #[arg(long)]
        completed: bool,
        #[arg(long)]
        failed: bool,
    },
    /// List agents
    List {
        /// Only agents in this status (queued, running, paused, completed, failed)
        #[arg(long)]
        status: Option<AgentStatus>,
    },
    /// Show detailed info for a single agent
    Show {
        /// Agent ID (or prefix)
        id: String,
    },
    /// Follow an agent's status and progress until it finishes
    Watch {
        /// Agent ID (or prefix)
        id: String,
    },
    /// View an agent's log
    Logs {
        /// Agent ID (or prefix)
        id: String,
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Only entries strictly before this epoch-ms timestamp
        #[arg(long, conflicts_with = "follow")]
        before: Option<u64>,
        /// Stream new entries until the agent finishes
        #[arg(long, short)]
        follow: bool,
    },
    /// Launch counts and success rate over recent days
    Stats {
        /// Window size in days
        #[arg(long, default_value = "7")]
        days: u32,
        /// Derive from agents known to this client instead of asking the backend
        #[arg(long)]
        local: bool,
    },
}

pub async fn run(command: Command, client: &Client, format: OutputFormat) -> Result<()> {
    match command {
        Command::Launch {
            name,
            prompt,
            profile,
            project,
            auto_branch,
            auto_pr,
            base_branch,
            max_minutes,
            watch,
        } => {
            let mut config = deck_core::LaunchConfig::new(name, prompt)
                .auto_branch(auto_branch)
                .auto_pr(auto_pr)
                .max_duration_minutes(max_minutes);
            config.profile_id = profile;
            config.project_id = project;
            config.base_branch = base_branch;
            agent::launch(client, config, watch, format).await
        }
        Command::Pause { id } => agent::act(client, &id, agent::Verb::Pause).await,
        Command::Resume { id } => agent::act(client, &id, agent::Verb::Resume).await,
        Command::Cancel { id } => agent::act(client, &id, agent::Verb::Cancel).await,
        Command::Delete { id } => agent::delete(client, &id).await,
        Command::Send { id, message } => agent::send(client, &id, &message).await,
        Command::Clear { completed, failed: _ } => {
            let status = if completed { AgentStatus::Completed } else { AgentStatus::Failed };
            agent::clear(client, status, format).await
        }
        Command::List { status } => display::list(client, status, format).await,
        Command::Show { id } => display::show(client, &id, format).await,
        Command::Watch { id } => display::watch(client, &id, format).await,
        Command::Logs { id, limit, before, follow } => {
            display::logs(client, &id, limit, before, follow, format).await
        }
        Command::Stats { days, local } => stats::stats(client, days, local, format).await,
    }
}
