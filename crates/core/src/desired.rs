// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired-state entries: the durable declaration of where each workload
//! ought to run, plus retry bookkeeping for recovery.

use crate::id::WorkloadId;
use crate::node::NodeKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default cap on recovery attempts per workload.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Desired-state status. Narrower than [`crate::WorkloadStatus`]: an entry is
/// either actively reconciled or terminally failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredStatus {
    Running,
    Failed,
}

crate::simple_display! {
    DesiredStatus {
        Running => "running",
        Failed => "failed",
    }
}

/// One row of the desired-state table, keyed by `workload_id`.
///
/// `retry_count` accumulates across recovery attempts, successful ones
/// included, so the total number of re-placements is bounded by
/// `max_retries` over the workload's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredEntry {
    pub workload_id: WorkloadId,
    pub script_path: String,
    pub target_node: NodeKey,
    pub status: DesiredStatus,
    pub created_at: DateTime<Utc>,
    pub retry_count: u32,
    pub max_retries: u32,
}

impl DesiredEntry {
    pub fn new(
        workload_id: WorkloadId,
        script_path: impl Into<String>,
        target_node: NodeKey,
        created_at: DateTime<Utc>,
        max_retries: u32,
    ) -> Self {
        Self {
            workload_id,
            script_path: script_path.into(),
            target_node,
            status: DesiredStatus::Running,
            created_at,
            retry_count: 0,
            max_retries,
        }
    }

    /// True once the retry budget is spent and the entry may no longer be
    /// recovered.
    pub fn retries_exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }
}

crate::builder! {
    pub struct DesiredEntryBuilder => DesiredEntry {
        into {
            workload_id: WorkloadId = "wld-test000000000000000",
            script_path: String = "/bin/job",
            target_node: NodeKey = "10.0.0.1:9001"
        }
        set {
            status: DesiredStatus = DesiredStatus::Running,
            created_at: DateTime<Utc> = Utc::now(),
            retry_count: u32 = 0,
            max_retries: u32 = DEFAULT_MAX_RETRIES
        }
    }
}

#[cfg(test)]
#[path = "desired_tests.rs"]
mod tests;
