// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd: operator CLI for the herd scheduler.

mod client;
mod color;
mod commands;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use client::SchedulerClient;

#[derive(Parser)]
#[command(name = "herd", about = "Micro-orchestrator control CLI", version)]
struct Cli {
    /// Scheduler host
    #[arg(long, global = true, default_value = "localhost")]
    host: String,

    /// Scheduler port
    #[arg(long, global = true, default_value_t = 7070)]
    port: u16,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show scheduler liveness and counts
    Status,
    /// List registered nodes
    Nodes,
    /// Register a node agent
    Register { host: String, port: u16 },
    /// List workloads
    Workloads,
    /// Submit a workload
    Submit { script_path: String },
    /// Stop a workload
    Stop { workload_id: String },
    /// Show the health summary with per-node detail
    Health,
    /// Show recovery metrics
    Recovery,
    /// Force an immediate health check
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let client = SchedulerClient::new(&cli.host, cli.port);

    let result = match &cli.command {
        Command::Status => commands::status(&client).await,
        Command::Nodes => commands::nodes(&client).await,
        Command::Register { host, port } => commands::register(&client, host, *port).await,
        Command::Workloads => commands::workloads(&client).await,
        Command::Submit { script_path } => commands::submit(&client, script_path).await,
        Command::Stop { workload_id } => commands::stop(&client, workload_id).await,
        Command::Health => commands::health(&client).await,
        Command::Recovery => commands::recovery(&client).await,
        Command::Check => commands::check(&client).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let enabled = color::should_colorize();
            eprintln!("{} {e:#}", color::paint(color::codes::ERR, "✗", enabled));
            ExitCode::FAILURE
        }
    }
}
