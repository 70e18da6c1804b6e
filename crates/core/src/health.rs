// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-node health-check bookkeeping.

use crate::node::NodeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of the most recent probes against one node.
///
/// Updated atomically per probe; `consecutive_failures` resets to zero on any
/// success. `response_time` is the latency of the last successful probe in
/// seconds and keeps its previous value across failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub last_check: DateTime<Utc>,
    pub consecutive_failures: u32,
    pub response_time: f64,
    pub status: NodeStatus,
}

impl HealthCheck {
    /// State before any probe has completed.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            last_check: at,
            consecutive_failures: 0,
            response_time: 0.0,
            status: NodeStatus::Unknown,
        }
    }

    pub fn record_success(&mut self, at: DateTime<Utc>, response_time: f64) {
        self.last_check = at;
        self.consecutive_failures = 0;
        self.response_time = response_time;
        self.status = NodeStatus::Online;
    }

    pub fn record_failure(&mut self, at: DateTime<Utc>) {
        self.last_check = at;
        self.consecutive_failures += 1;
        self.status = NodeStatus::Offline;
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
