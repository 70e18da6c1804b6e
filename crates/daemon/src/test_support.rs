// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for daemon tests: the full control-plane stack wired to a
//! scripted fake agent and a fake clock.

use std::sync::Arc;

use herd_core::{FakeClock, NodeKey};

use crate::agent::fake::FakeNodeAgent;
use crate::config::Config;
use crate::desired::DesiredStateTable;
use crate::monitor::HealthMonitor;
use crate::recovery::RecoveryEngine;
use crate::registry::{NodeRegistry, WorkloadRegistry};
use crate::scheduler::Scheduler;

pub(crate) struct Stack {
    pub nodes: Arc<NodeRegistry>,
    pub workloads: Arc<WorkloadRegistry>,
    pub desired: Arc<DesiredStateTable>,
    pub agent: Arc<FakeNodeAgent>,
    pub clock: Arc<FakeClock>,
    pub monitor: Arc<HealthMonitor>,
    pub recovery: Arc<RecoveryEngine>,
    pub scheduler: Arc<Scheduler>,
}

/// Assemble the whole stack with default config and a fake agent/clock.
pub(crate) fn stack() -> Stack {
    stack_with(Config::default())
}

pub(crate) fn stack_with(config: Config) -> Stack {
    let nodes = Arc::new(NodeRegistry::new());
    let workloads = Arc::new(WorkloadRegistry::new());
    let desired = Arc::new(DesiredStateTable::new());
    let agent = Arc::new(FakeNodeAgent::new());
    let clock = Arc::new(FakeClock::new());

    let monitor = Arc::new(HealthMonitor::new(
        Arc::clone(&nodes),
        Arc::clone(&desired),
        agent.clone() as Arc<dyn crate::agent::NodeAgent>,
        clock.clone() as Arc<dyn herd_core::Clock>,
        &config,
    ));
    let recovery = Arc::new(RecoveryEngine::new(
        Arc::clone(&nodes),
        Arc::clone(&workloads),
        Arc::clone(&desired),
        agent.clone() as Arc<dyn crate::agent::NodeAgent>,
        &config,
    ));
    let scheduler = Arc::new(Scheduler::new(
        Arc::clone(&nodes),
        Arc::clone(&workloads),
        Arc::clone(&desired),
        agent.clone() as Arc<dyn crate::agent::NodeAgent>,
        clock.clone() as Arc<dyn herd_core::Clock>,
        Arc::clone(&monitor),
        &config,
    ));

    Stack {
        nodes,
        workloads,
        desired,
        agent,
        clock,
        monitor,
        recovery,
        scheduler,
    }
}

impl Stack {
    /// Register a node, script it healthy at `cpu`, and run one probe pass
    /// so the registry observes it online.
    pub(crate) async fn online_node(&self, host: &str, port: u16, cpu: f64) -> NodeKey {
        let key = self.scheduler.register_node(host, port);
        self.agent.set_healthy(&key, cpu);
        self.monitor.check_all().await;
        key
    }
}
