// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recovery engine: drains the pending-recovery set by re-placing workloads
//! on healthy nodes.
//!
//! One eligible target is chosen per pass so repeated retries spread over
//! time instead of stampeding a single healthy node. Every attempt spends
//! one unit of the workload's retry budget whether or not a `/start`
//! response ever arrived, which bounds total attempts.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::agent::NodeAgent;
use crate::config::Config;
use crate::desired::{AttemptDisposition, AttemptOutcome, DesiredStateTable};
use crate::registry::{NodeRegistry, WorkloadRegistry};
use herd_core::WorkloadStatus;

pub struct RecoveryEngine {
    nodes: Arc<NodeRegistry>,
    workloads: Arc<WorkloadRegistry>,
    desired: Arc<DesiredStateTable>,
    agent: Arc<dyn NodeAgent>,
    interval: std::time::Duration,
    cpu_threshold: f64,
}

impl RecoveryEngine {
    pub fn new(
        nodes: Arc<NodeRegistry>,
        workloads: Arc<WorkloadRegistry>,
        desired: Arc<DesiredStateTable>,
        agent: Arc<dyn NodeAgent>,
        config: &Config,
    ) -> Self {
        Self {
            nodes,
            workloads,
            desired,
            agent,
            interval: config.recovery_interval,
            cpu_threshold: config.cpu_threshold,
        }
    }

    /// Recovery loop. Never returns; spawned as a background task.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.process_once().await;
        }
    }

    /// Drain one pass of the pending set onto a single healthy target.
    pub async fn process_once(&self) {
        let pending = self.desired.pending();
        if pending.is_empty() {
            return;
        }

        let Some(target) = self.nodes.select_eligible(self.cpu_threshold) else {
            warn!(pending = pending.len(), "no healthy node available for recovery");
            return;
        };

        for id in pending {
            match self.desired.begin_attempt(&id) {
                AttemptDisposition::Dropped => {
                    warn!(workload = %id, "pending workload no longer in desired state");
                }
                AttemptDisposition::Exhausted => {
                    error!(workload = %id, "retry limit exceeded; workload marked failed");
                }
                AttemptDisposition::Proceed { script_path } => {
                    match self.agent.start(&target, &script_path).await {
                        Ok(pid) => {
                            let outcome = self.desired.record_attempt(&id, true, Some(&target));
                            if outcome == AttemptOutcome::Recovered {
                                self.workloads.update_placement(
                                    &id,
                                    target.host(),
                                    target.port(),
                                    pid,
                                );
                                self.workloads.update_status(&id, WorkloadStatus::Running, None);
                                info!(workload = %id, node = %target, "workload recovered");
                            }
                        }
                        Err(err) => {
                            let outcome = self.desired.record_attempt(&id, false, None);
                            match outcome {
                                AttemptOutcome::Exhausted => {
                                    error!(
                                        workload = %id,
                                        error = %err,
                                        "recovery failed; retry limit exceeded"
                                    );
                                }
                                _ => {
                                    warn!(
                                        workload = %id,
                                        node = %target,
                                        error = %err,
                                        "recovery attempt failed"
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
