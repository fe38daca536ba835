// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle commands: launch, pause, resume, cancel, delete, send, clear.

use anyhow::Result;
use deck_core::{AgentStatus, LaunchConfig};

use crate::client::{resolve, Client};
use crate::color;
use crate::output::{print_json, OutputFormat};

#[derive(Clone, Copy)]
pub(super) enum Verb {
    Pause,
    Resume,
    Cancel,
}

pub(super) async fn launch(
    client: &Client,
    config: LaunchConfig,
    watch: bool,
    format: OutputFormat,
) -> Result<()> {
    let record = client.launch_agent(config).await?;
    match format {
        OutputFormat::Json if !watch => print_json(&record)?,
        OutputFormat::Json => {}
        OutputFormat::Text => {
            println!("Launched {} ({})", color::header(&record.name), record.id);
        }
    }
    if watch {
        super::display::follow(client, &record.id, format).await?;
    }
    Ok(())
}

/// Commands are asynchronous: the agent's status changes only once the
/// backend reports it
pub(super) async fn act(client: &Client, id: &str, verb: Verb) -> Result<()> {
    let id = resolve(client, id).await?;
    let label = match verb {
        Verb::Pause => {
            client.pause_agent(&id).await?;
            "Pause"
        }
        Verb::Resume => {
            client.resume_agent(&id).await?;
            "Resume"
        }
        Verb::Cancel => {
            client.cancel_agent(&id).await?;
            "Cancel"
        }
    };
    println!("{label} requested for {}", color::header(id.as_str()));
    Ok(())
}

pub(super) async fn delete(client: &Client, id: &str) -> Result<()> {
    let id = resolve(client, id).await?;
    client.delete_agent(&id).await?;
    println!("Deleted {}", color::header(id.as_str()));
    Ok(())
}

pub(super) async fn send(client: &Client, id: &str, message: &str) -> Result<()> {
    let id = resolve(client, id).await?;
    client.intervene_agent(&id, message).await?;
    println!("Sent to {}", color::header(id.as_str()));
    Ok(())
}

pub(super) async fn clear(client: &Client, status: AgentStatus, format: OutputFormat) -> Result<()> {
    client.load_agents().await?;
    let removed = match status {
        AgentStatus::Completed => client.clear_completed_agents().await?,
        _ => client.clear_failed_agents().await?,
    };
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "deleted": removed }))?,
        OutputFormat::Text => {
            for id in &removed {
                println!("Deleted {}", color::muted(id.as_str()));
            }
            println!("{} {status} agent(s) deleted", removed.len());
        }
    }
    Ok(())
}
