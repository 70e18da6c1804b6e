// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! herdd: the herd scheduler daemon.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use herd_daemon::config::Config;
use herd_daemon::{env, lifecycle};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "herdd", about = "herd scheduler daemon", version)]
struct Args {
    /// Address for the control API (overrides HERD_LISTEN)
    #[arg(long)]
    listen: Option<String>,

    /// State directory (overrides HERD_STATE_DIR)
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    config.state_dir = match args.state_dir {
        Some(dir) => dir,
        None => match env::state_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
