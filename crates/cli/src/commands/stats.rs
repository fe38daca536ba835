// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::Result;

use crate::client::Client;
use crate::output::{print_json, render_stats, OutputFormat};

/// Backend stats, or stats derived from hydrated agents when the backend
/// has no stats endpoint or `--local` is given
pub(super) async fn stats(
    client: &Client,
    days: u32,
    local: bool,
    format: OutputFormat,
) -> Result<()> {
    let stats = if local {
        client.load_agents().await?;
        client.local_stats(days)
    } else {
        match client.fetch_stats(days).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "stats unavailable, deriving from agent list");
                client.load_agents().await.map_err(|_| e)?;
                client.local_stats(days)
            }
        }
    };
    match format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Text => print!("{}", render_stats(&stats)),
    }
    Ok(())
}
