// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-side commands: list, show, watch, logs.

use anyhow::Result;
use deck_core::{AgentId, AgentRecord, AgentStatus, Clock, LogEntry, SystemClock};
use deck_wire::LogQuery;

use crate::client::{resolve, Client};
use crate::exit_error::{codes, ExitError};
use crate::output::{
    print_json, render_list, render_log_line, render_show, render_watch_line, OutputFormat,
};

pub(super) async fn list(
    client: &Client,
    status: Option<AgentStatus>,
    format: OutputFormat,
) -> Result<()> {
    client.load_agents().await?;
    let agents = match status {
        Some(status) => client.agents_with_status(status),
        None => client.agents(),
    };
    match format {
        OutputFormat::Json => print_json(&agents)?,
        OutputFormat::Text => print!("{}", render_list(&agents, SystemClock.epoch_ms())),
    }
    Ok(())
}

pub(super) async fn show(client: &Client, id: &str, format: OutputFormat) -> Result<()> {
    let id = resolve(client, id).await?;
    let Some(record) = client.agent(&id) else {
        return Err(ExitError::not_found(id.as_str()).into());
    };
    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Text => print!("{}", render_show(&record, SystemClock.epoch_ms())),
    }
    Ok(())
}

pub(super) async fn watch(client: &Client, id: &str, format: OutputFormat) -> Result<()> {
    let id = resolve(client, id).await?;
    follow(client, &id, format).await
}

/// Print a line per visible change until the agent finishes
pub(super) async fn follow(client: &Client, id: &AgentId, format: OutputFormat) -> Result<()> {
    let mut changes = client.changes();
    client.subscribe_to_agent(id)?;
    let mut last: Option<String> = None;
    loop {
        let record = tracked(client, id)?;
        let line = match format {
            OutputFormat::Json => serde_json::to_string(&record)?,
            OutputFormat::Text => {
                render_watch_line(&record, client.pending(id), client.sync_health(id))
            }
        };
        if last.as_ref() != Some(&line) {
            println!("{line}");
            last = Some(line);
        }
        if record.is_terminal() {
            return Ok(());
        }
        tokio::select! {
            changed = changes.changed() => if changed.is_err() { return Ok(()) },
            _ = tokio::signal::ctrl_c() => return Err(interrupted(client, id)),
        }
    }
}

pub(super) async fn logs(
    client: &Client,
    id: &str,
    limit: usize,
    before: Option<u64>,
    follow: bool,
    format: OutputFormat,
) -> Result<()> {
    let id = resolve(client, id).await?;
    let query = match before {
        Some(ts) => LogQuery::before(limit, ts),
        None => LogQuery::latest(limit),
    };
    let page = client.fetch_logs(&id, query).await?;
    print_entries(&page, format)?;
    if !follow {
        return Ok(());
    }

    let mut changes = client.changes();
    let mut seen = tracked(client, &id)?.logs.total_len();
    client.subscribe_to_agent(&id)?;
    loop {
        let record = tracked(client, &id)?;
        let total = record.logs.total_len();
        if total > seen {
            let fresh = usize::try_from(total - seen).unwrap_or(usize::MAX);
            let skip = record.logs.len().saturating_sub(fresh);
            let entries: Vec<LogEntry> = record.logs.iter().skip(skip).cloned().collect();
            print_entries(&entries, format)?;
            seen = total;
        }
        if record.is_terminal() {
            return Ok(());
        }
        tokio::select! {
            changed = changes.changed() => if changed.is_err() { return Ok(()) },
            _ = tokio::signal::ctrl_c() => return Err(interrupted(client, &id)),
        }
    }
}

fn print_entries(entries: &[LogEntry], format: OutputFormat) -> Result<()> {
    for entry in entries {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(entry)?),
            OutputFormat::Text => println!("{}", render_log_line(entry)),
        }
    }
    Ok(())
}

fn tracked(client: &Client, id: &AgentId) -> Result<AgentRecord> {
    client.agent(id).ok_or_else(|| {
        ExitError::new(codes::REJECTED, format!("agent {id} is no longer tracked")).into()
    })
}

fn interrupted(client: &Client, id: &AgentId) -> anyhow::Error {
    client.unsubscribe_from_agent(id);
    ExitError::new(codes::INTERRUPTED, String::new()).into()
}
