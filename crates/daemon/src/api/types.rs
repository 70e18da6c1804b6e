// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DTO structs for the control API. The CLI deserializes these same types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use herd_core::{HealthCheck, NodeStatus, WorkloadId};
use serde::{Deserialize, Serialize};

/// Body of `GET /health`: liveness plus registry counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub nodes: usize,
    pub workloads: usize,
}

/// `POST /workloads` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub workload_id: WorkloadId,
    pub node: String,
    pub status: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Per-node detail inside the health summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeHealthDetail {
    pub node_key: String,
    pub host: String,
    pub port: u16,
    pub status: NodeStatus,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub consecutive_failures: u32,
    pub last_check: Option<DateTime<Utc>>,
    pub response_time: Option<f64>,
}

/// Body of `GET /health/summary`: aggregated counters plus per-node details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_nodes: usize,
    pub online_nodes: usize,
    pub offline_nodes: usize,
    pub degraded_nodes: usize,
    pub failed_workloads: usize,
    pub desired_workloads: usize,
    pub node_details: Vec<NodeHealthDetail>,
}

/// Body of `GET /recovery/metrics`: the pending set and probe bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryMetrics {
    pub failed_workloads: Vec<WorkloadId>,
    pub desired_state_count: usize,
    pub health_checks: HashMap<String, HealthCheck>,
}
