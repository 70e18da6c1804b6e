// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence flusher: periodically snapshots the desired-state table to
//! disk. Write failures are logged and retried on the next tick; the
//! cadence is fixed.

use std::path::PathBuf;
use std::sync::Arc;

use herd_core::Clock;
use herd_storage::{write_snapshot, StateSnapshot};
use tracing::{debug, warn};

use crate::config::Config;
use crate::desired::DesiredStateTable;

pub struct Flusher {
    desired: Arc<DesiredStateTable>,
    clock: Arc<dyn Clock>,
    path: PathBuf,
    interval: std::time::Duration,
}

impl Flusher {
    pub fn new(desired: Arc<DesiredStateTable>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            desired,
            clock,
            path: config.snapshot_path(),
            interval: config.persistence_interval,
        }
    }

    /// Flush loop. Never returns; spawned as a background task.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.flush_once();
        }
    }

    /// Take a consistent snapshot and write it atomically.
    pub fn flush_once(&self) {
        let snapshot = StateSnapshot::new(self.clock.utc_now(), self.desired.snapshot());
        match write_snapshot(&self.path, &snapshot) {
            Ok(()) => debug!(
                path = %self.path.display(),
                workloads = snapshot.workloads.len(),
                "state snapshot written"
            ),
            Err(e) => warn!(path = %self.path.display(), error = %e, "state snapshot failed"),
        }
    }
}

#[cfg(test)]
#[path = "flusher_tests.rs"]
mod tests;
