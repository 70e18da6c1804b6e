// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: state directory, exclusive lock, snapshot recovery,
//! background workers, and the control listener.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use herd_core::SystemClock;
use herd_storage::load_snapshot;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::agent::HttpNodeAgent;
use crate::api::{self, ApiCtx};
use crate::config::Config;
use crate::desired::DesiredStateTable;
use crate::flusher::Flusher;
use crate::monitor::HealthMonitor;
use crate::recovery::RecoveryEngine;
use crate::registry::{NodeRegistry, WorkloadRegistry};
use crate::scheduler::Scheduler;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("another daemon is already running (lock held at {})", .0.display())]
    LockHeld(PathBuf),
    #[error("cannot determine state directory (HOME unset)")]
    NoStateDir,
}

/// Start the daemon and serve the control API until the process is killed.
pub async fn run(config: Config) -> Result<(), LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Acquire the lock before touching any state. Open without truncating so
    // a losing contender does not wipe the running daemon's PID.
    let lock_path = config.lock_path();
    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(|_| LifecycleError::LockHeld(lock_path.clone()))?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    let desired = Arc::new(DesiredStateTable::new());
    match load_snapshot(&config.snapshot_path()) {
        Ok(Some(snapshot)) => {
            info!(
                workloads = snapshot.workloads.len(),
                taken_at = %snapshot.timestamp,
                "loaded desired-state snapshot"
            );
            desired.load(snapshot.workloads);
        }
        Ok(None) => info!("no snapshot found, starting with empty desired state"),
        Err(e) => error!(error = %e, "failed to load snapshot, starting with empty desired state"),
    }

    let nodes = Arc::new(NodeRegistry::new());
    let workloads = Arc::new(WorkloadRegistry::new());
    let agent: Arc<dyn crate::agent::NodeAgent> = Arc::new(HttpNodeAgent::new(&config));
    let clock: Arc<dyn herd_core::Clock> = Arc::new(SystemClock);

    let monitor = Arc::new(HealthMonitor::new(
        Arc::clone(&nodes),
        Arc::clone(&desired),
        Arc::clone(&agent),
        Arc::clone(&clock),
        &config,
    ));
    let recovery = Arc::new(RecoveryEngine::new(
        Arc::clone(&nodes),
        Arc::clone(&workloads),
        Arc::clone(&desired),
        Arc::clone(&agent),
        &config,
    ));
    let flusher = Arc::new(Flusher::new(
        Arc::clone(&desired),
        Arc::clone(&clock),
        &config,
    ));

    tokio::spawn(Arc::clone(&monitor).run());
    tokio::spawn(Arc::clone(&recovery).run());
    tokio::spawn(Arc::clone(&flusher).run());

    let scheduler = Arc::new(Scheduler::new(
        nodes, workloads, desired, agent, clock, monitor, &config,
    ));

    let listener = TcpListener::bind(&config.listen).await?;
    info!(listen = %config.listen, state_dir = %config.state_dir.display(), "scheduler listening");

    let app = api::router(ApiCtx { scheduler });
    axum::serve(listener, app).await?;

    // Unreachable in practice; serve only returns on listener failure.
    drop(lock_file);
    Ok(())
}
