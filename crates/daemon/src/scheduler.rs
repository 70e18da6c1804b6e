// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler façade: initial placement and the operator-facing control
//! surface.
//!
//! Owns the registries and the desired-state table; the health monitor and
//! recovery engine hold their own handles to the same structures and never
//! reach back into the façade.

use std::sync::Arc;

use herd_core::{Clock, NodeKey, NodeRecord, NodeStatus, WorkloadId, WorkloadRecord, WorkloadStatus};
use thiserror::Error;
use tracing::{error, info};

use crate::agent::NodeAgent;
use crate::api::types::{HealthSummary, NodeHealthDetail, RecoveryMetrics};
use crate::config::Config;
use crate::desired::DesiredStateTable;
use crate::monitor::HealthMonitor;
use crate::registry::{NodeRegistry, WorkloadRegistry};

/// Errors surfaced to control-API callers.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("No available nodes")]
    NoAvailableNodes,
    #[error("Failed to start workload")]
    StartFailed(String),
    #[error("Failed to stop workload")]
    StopFailed(String),
    #[error("Workload not found")]
    NotFound(WorkloadId),
}

pub struct Scheduler {
    nodes: Arc<NodeRegistry>,
    workloads: Arc<WorkloadRegistry>,
    desired: Arc<DesiredStateTable>,
    agent: Arc<dyn NodeAgent>,
    clock: Arc<dyn Clock>,
    monitor: Arc<HealthMonitor>,
    cpu_threshold: f64,
    max_retries: u32,
}

impl Scheduler {
    pub fn new(
        nodes: Arc<NodeRegistry>,
        workloads: Arc<WorkloadRegistry>,
        desired: Arc<DesiredStateTable>,
        agent: Arc<dyn NodeAgent>,
        clock: Arc<dyn Clock>,
        monitor: Arc<HealthMonitor>,
        config: &Config,
    ) -> Self {
        Self {
            nodes,
            workloads,
            desired,
            agent,
            clock,
            monitor,
            cpu_threshold: config.cpu_threshold,
            max_retries: config.max_retries,
        }
    }

    /// Register a node agent. Idempotent.
    pub fn register_node(&self, host: &str, port: u16) -> NodeKey {
        let key = self.nodes.register(host, port, self.clock.utc_now());
        info!(node = %key, "node registered");
        key
    }

    /// Place a new workload on the best eligible node and start it.
    ///
    /// The workload record exists (pending) while the `/start` is in flight
    /// and is removed again if the call fails, so a failed submit leaves no
    /// trace in either the registry or the desired-state table.
    pub async fn submit(&self, script_path: &str) -> Result<(WorkloadId, NodeKey), SchedulerError> {
        let Some(target) = self.nodes.select_eligible(self.cpu_threshold) else {
            return Err(SchedulerError::NoAvailableNodes);
        };

        let id = WorkloadId::new();
        self.workloads.insert(WorkloadRecord::new(
            id.clone(),
            script_path,
            target.host(),
            target.port(),
        ));

        match self.agent.start(&target, script_path).await {
            Ok(pid) => {
                self.workloads.mark_started(&id, pid, self.clock.utc_now());
                self.desired.register(
                    id.clone(),
                    script_path,
                    target.clone(),
                    self.clock.utc_now(),
                    self.max_retries,
                );
                info!(workload = %id, node = %target, script = script_path, "workload started");
                Ok((id, target))
            }
            Err(err) => {
                self.workloads.remove(&id);
                error!(node = %target, script = script_path, error = %err, "failed to start workload");
                Err(SchedulerError::StartFailed(err.to_string()))
            }
        }
    }

    /// Stop a running workload and withdraw its desired-state entry.
    ///
    /// A workload that was already stopped is reported as not found, which
    /// makes stop observably idempotent for operators.
    pub async fn stop(&self, id: &WorkloadId) -> Result<(), SchedulerError> {
        let workload = self
            .workloads
            .get(id)
            .filter(|w| w.status != WorkloadStatus::Stopped)
            .ok_or_else(|| SchedulerError::NotFound(id.clone()))?;

        let Some(pid) = workload.pid else {
            return Err(SchedulerError::StopFailed("workload has no pid".to_string()));
        };

        let node = workload.node_key();
        self.agent
            .stop(&node, pid)
            .await
            .map_err(|e| SchedulerError::StopFailed(e.to_string()))?;

        self.workloads
            .update_status(id, WorkloadStatus::Stopped, Some(self.clock.utc_now()));
        self.desired.unregister(id);
        info!(workload = %id, node = %node, "workload stopped");
        Ok(())
    }

    pub fn list_nodes(&self) -> Vec<NodeRecord> {
        self.nodes.list()
    }

    pub fn list_workloads(&self) -> Vec<WorkloadRecord> {
        self.workloads.list()
    }

    /// Counts for the liveness endpoint.
    pub fn counts(&self) -> (usize, usize) {
        (self.nodes.len(), self.workloads.len())
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.utc_now()
    }

    /// Aggregated health counters with per-node detail.
    pub fn health_summary(&self) -> HealthSummary {
        let nodes = self.nodes.list();
        let checks = self.monitor.checks_snapshot();

        let mut summary = HealthSummary {
            total_nodes: nodes.len(),
            online_nodes: 0,
            offline_nodes: 0,
            degraded_nodes: 0,
            failed_workloads: self.desired.pending_len(),
            desired_workloads: self.desired.len(),
            node_details: Vec::with_capacity(nodes.len()),
        };

        for node in nodes {
            match node.status {
                NodeStatus::Online => summary.online_nodes += 1,
                NodeStatus::Offline => summary.offline_nodes += 1,
                // Unknown nodes count as degraded in the roll-up
                NodeStatus::Degraded | NodeStatus::Unknown => summary.degraded_nodes += 1,
            }
            let check = checks.get(&node.key());
            summary.node_details.push(NodeHealthDetail {
                node_key: node.key().addr().to_string(),
                host: node.host.clone(),
                port: node.port,
                status: node.status,
                cpu_usage: node.cpu_usage,
                memory_usage: node.memory_usage,
                consecutive_failures: check.map(|c| c.consecutive_failures).unwrap_or(0),
                last_check: check.map(|c| c.last_check),
                response_time: check.map(|c| c.response_time),
            });
        }
        summary
    }

    /// Run one immediate probe pass and report the resulting summary.
    pub async fn force_health_check(&self) -> HealthSummary {
        self.monitor.check_all().await;
        self.health_summary()
    }

    /// Recovery bookkeeping for the metrics endpoint.
    pub fn recovery_metrics(&self) -> RecoveryMetrics {
        RecoveryMetrics {
            failed_workloads: self.desired.pending(),
            desired_state_count: self.desired.len(),
            health_checks: self
                .monitor
                .checks_snapshot()
                .into_iter()
                .map(|(key, check)| (key.addr().to_string(), check))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
