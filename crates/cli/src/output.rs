// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text and JSON rendering of agents, logs, and stats.

use std::collections::HashSet;

use clap::ValueEnum;
use deck_core::{
    expanded_task_ids, format_duration_ms, format_elapsed, short, Action, AgentRecord,
    AgentStats, LogEntry, TaskId, TaskNode,
};
use deck_engine::SyncHealth;
use serde::Serialize;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const ID_WIDTH: usize = 12;
const NAME_WIDTH: usize = 24;
const STATUS_WIDTH: usize = 10;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a timestamp as relative time (e.g., "5s", "2m", "1h", "3d")
pub fn format_time_ago(epoch_ms: u64, now_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    format_elapsed(now_ms.saturating_sub(epoch_ms) / 1000)
}

/// UTC wall-clock time of day, `HH:MM:SS`
pub fn format_clock(epoch_ms: u64) -> String {
    let secs = (epoch_ms / 1000) % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3_600, (secs % 3_600) / 60, secs % 60)
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

fn status_cell(record: &AgentRecord) -> String {
    let name = record.status.to_string();
    let fill = STATUS_WIDTH.saturating_sub(name.len());
    format!("{}{}", color::status(record.status), " ".repeat(fill))
}

pub fn render_list(records: &[AgentRecord], now_ms: u64) -> String {
    if records.is_empty() {
        return "No agents found\n".to_string();
    }
    let mut lines = vec![format!(
        "{} {} {} {:>4}  {}",
        color::header(&pad("ID", ID_WIDTH)),
        color::header(&pad("NAME", NAME_WIDTH)),
        color::header(&pad("STATUS", STATUS_WIDTH)),
        color::header("PROG"),
        color::header("AGE"),
    )];
    lines.extend(records.iter().map(|record| {
        format!(
            "{} {} {} {:>3}%  {}",
            color::muted(&pad(short(record.id.as_str(), ID_WIDTH), ID_WIDTH)),
            pad(short(&record.name, NAME_WIDTH), NAME_WIDTH),
            status_cell(record),
            record.display_progress(),
            format_time_ago(record.created_at_ms, now_ms),
        )
    }));
    block(lines)
}

pub fn render_show(record: &AgentRecord, now_ms: u64) -> String {
    let mut lines = vec![
        format!("{} {}", color::header("Agent:"), record.id),
        format!("  Name:     {}", record.name),
        format!("  Status:   {}", color::status(record.status)),
        format!("  Progress: {}%", record.display_progress()),
        format!("  Created:  {} ago", format_time_ago(record.created_at_ms, now_ms)),
    ];
    if let Some(duration) = record.duration_ms() {
        lines.push(format!("  Duration: {}", format_duration_ms(duration)));
    } else if let Some(started) = record.started_at_ms {
        lines.push(format!("  Running:  {}", format_duration_ms(now_ms.saturating_sub(started))));
    }
    let fields = [
        ("Branch:  ", &record.branch),
        ("PR:      ", &record.pr_url),
        ("Error:   ", &record.error),
        ("Result:  ", &record.result_summary),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("  {label} {value}"));
        }
    }
    if !record.tasks.is_empty() {
        lines.push(String::new());
        lines.push(color::header("Tasks:"));
        let expanded = expanded_task_ids(&record.tasks);
        for node in &record.tasks {
            render_task(&mut lines, node, &expanded, 1);
        }
    }
    lines.push(String::new());
    lines.push(color::context(&record.prompt));
    block(lines)
}

/// Collapsed nodes hide their children unless they lead to work in progress
fn render_task(
    lines: &mut Vec<String>,
    node: &TaskNode,
    expanded: &HashSet<TaskId>,
    depth: usize,
) {
    let has_children = !node.children.is_empty();
    let open = expanded.contains(&node.id);
    let marker = match (has_children, open) {
        (false, _) => " ",
        (true, true) => "▾",
        (true, false) => "▸",
    };
    lines.push(format!(
        "{}{} {} {}",
        "  ".repeat(depth),
        marker,
        node.name,
        color::muted(&format!("[{}]", node.effective_status()))
    ));
    if open {
        for child in &node.children {
            render_task(lines, child, expanded, depth + 1);
        }
    }
}

/// One `watch` line: status, progress, and sync state worth flagging
pub fn render_watch_line(
    record: &AgentRecord,
    pending: Option<Action>,
    health: SyncHealth,
) -> String {
    let mut parts = vec![format!("{} {:>3}%", status_cell(record), record.display_progress())];
    if let Some(action) = pending {
        parts.push(color::context(&format!("({action} pending)")));
    }
    if matches!(health, SyncHealth::Degraded | SyncHealth::Stale) {
        parts.push(color::muted(&format!("[{health}]")));
    }
    if let Some(payload) = record.error.as_ref().or(record.result_summary.as_ref()) {
        parts.push(payload.clone());
    }
    parts.join("  ")
}

pub fn render_log_line(entry: &LogEntry) -> String {
    format!(
        "{} {} {}",
        color::muted(&format_clock(entry.timestamp_ms)),
        color::context(&format!("{:<7}", entry.level.to_string())),
        entry.message
    )
}

pub fn render_stats(stats: &AgentStats) -> String {
    let mut lines = vec![
        color::header("Agents"),
        format!("  Total:     {}", stats.total),
        format!("  Completed: {}", stats.completed),
        format!("  Failed:    {}", stats.failed),
        format!("  Queued:    {}", stats.queued),
        format!("  Success:   {:.0}%", stats.success_rate() * 100.0),
        format!("  Avg time:  {:.1}m", stats.avg_duration_minutes),
    ];
    if !stats.by_day.is_empty() {
        lines.push(String::new());
        lines.push(color::header("By day"));
        lines.extend(stats.by_day.iter().map(|(day, count)| format!("  {day}  {count}")));
    }
    block(lines)
}

/// Newline-terminated lines
fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
