// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health monitor: periodic liveness probing and failure classification.
//!
//! Each tick probes every registered node's `/status`. A 2xx resets the
//! node's failure streak and refreshes its utilization; anything else
//! (error status, transport failure, timeout) extends the streak. When the
//! streak reaches the failure threshold the node transitions to offline
//! exactly once and every running workload desired onto it is queued for
//! recovery.
//!
//! Probes are sequential within a tick; the tick interval absorbs the
//! worst-case aggregate latency. A node's classification is a single
//! critical section per probe, so observers never see a half-updated check.

use std::collections::HashMap;
use std::sync::Arc;

use herd_core::{Clock, HealthCheck, NodeKey};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::agent::{AgentError, NodeAgent};
use crate::config::Config;
use crate::desired::DesiredStateTable;
use crate::registry::NodeRegistry;

pub struct HealthMonitor {
    nodes: Arc<NodeRegistry>,
    desired: Arc<DesiredStateTable>,
    agent: Arc<dyn NodeAgent>,
    clock: Arc<dyn Clock>,
    checks: Mutex<HashMap<NodeKey, HealthCheck>>,
    interval: std::time::Duration,
    failure_threshold: u32,
}

impl HealthMonitor {
    pub fn new(
        nodes: Arc<NodeRegistry>,
        desired: Arc<DesiredStateTable>,
        agent: Arc<dyn NodeAgent>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            nodes,
            desired,
            agent,
            clock,
            checks: Mutex::new(HashMap::new()),
            interval: config.health_check_interval,
            failure_threshold: config.failure_threshold,
        }
    }

    /// Probe loop. Never returns; spawned as a background task.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.check_all().await;
        }
    }

    /// One full probe pass over the registered nodes. Also the entry point
    /// for the force-check API.
    pub async fn check_all(&self) {
        for key in self.nodes.keys() {
            self.probe(&key).await;
        }
    }

    async fn probe(&self, key: &NodeKey) {
        let started = self.clock.now();
        let result = self.agent.status(key).await;
        let elapsed = (self.clock.now() - started).as_secs_f64();
        let now = self.clock.utc_now();

        match result {
            Ok(report) => {
                {
                    let mut checks = self.checks.lock();
                    checks
                        .entry(key.clone())
                        .or_insert_with(|| HealthCheck::new(now))
                        .record_success(now, elapsed);
                }
                self.nodes.apply_report(key, &report, now);
                debug!(node = %key, response_time = elapsed, "probe ok");
            }
            Err(err) => self.record_failure(key, &err),
        }
    }

    fn record_failure(&self, key: &NodeKey, err: &AgentError) {
        let now = self.clock.utc_now();
        let failures = {
            let mut checks = self.checks.lock();
            let check = checks.entry(key.clone()).or_insert_with(|| HealthCheck::new(now));
            check.record_failure(now);
            check.consecutive_failures
        };
        debug!(node = %key, failures, error = %err, "probe failed");

        // Transition to offline fires once per outage; mark_offline reports
        // whether this probe was the one that crossed the line.
        if failures >= self.failure_threshold && self.nodes.mark_offline(key) {
            warn!(node = %key, failures, error = %err, "node marked offline");
            let affected = self.desired.mark_node_for_recovery(key);
            if !affected.is_empty() {
                info!(
                    node = %key,
                    workloads = affected.len(),
                    "queued workloads for recovery"
                );
            }
        }
    }

    /// Copy of the per-node health checks, for summaries and metrics.
    pub fn checks_snapshot(&self) -> HashMap<NodeKey, HealthCheck> {
        self.checks.lock().clone()
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
