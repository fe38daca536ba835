// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! deck: launch and follow background coding agents from the terminal

mod client;
mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::Parser;
use deck_engine::CommandError;
use tracing_subscriber::EnvFilter;

use crate::config::DeckConfig;
use crate::exit_error::{codes, ExitError};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "deck", version = env::VERSION, styles = color::styles())]
#[command(about = "Launch and follow background coding agents")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env::log_filter()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        let code = exit_code(&err);
        let message = format!("{err:#}");
        if !message.is_empty() {
            eprintln!("error: {message}");
        }
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = DeckConfig::load()?;
    let client = client::connect(&config)?;
    commands::run(cli.command, &client, cli.output).await
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        return exit.code;
    }
    if let Some(command) = err.downcast_ref::<CommandError>() {
        return ExitError::from(command.clone()).code;
    }
    codes::FAILURE
}
