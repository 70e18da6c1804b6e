// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workload records and their lifecycle states.

use crate::id::WorkloadId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a workload as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadStatus {
    /// Submitted, placement chosen, `/start` not yet acknowledged
    Pending,
    /// Running on its assigned node
    Running,
    /// Stopped by operator request
    Stopped,
    /// Terminal failure (recovery exhausted)
    Failed,
}

crate::simple_display! {
    WorkloadStatus {
        Pending => "pending",
        Running => "running",
        Stopped => "stopped",
        Failed => "failed",
    }
}

/// A submitted workload and its current placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub id: WorkloadId,
    pub script_path: String,
    pub node_host: String,
    pub node_port: u16,
    pub pid: Option<u32>,
    pub status: WorkloadStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl WorkloadRecord {
    /// New submission placed on `host:port`, awaiting `/start`.
    pub fn new(id: WorkloadId, script_path: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            id,
            script_path: script_path.into(),
            node_host: host.into(),
            node_port: port,
            pid: None,
            status: WorkloadStatus::Pending,
            start_time: None,
            end_time: None,
        }
    }

    /// The node this workload is currently placed on.
    pub fn node_key(&self) -> crate::node::NodeKey {
        crate::node::NodeKey::new(&self.node_host, self.node_port)
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
