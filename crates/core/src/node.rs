// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node identity, status, and observed state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a node agent: `host:port`.
///
/// Orderable so that selection tie-breaks and listings are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(host: &str, port: u16) -> Self {
        Self(format!("{host}:{port}"))
    }

    /// The `host:port` address string used for TCP connections.
    pub fn addr(&self) -> &str {
        &self.0
    }

    pub fn host(&self) -> &str {
        self.0.rsplit_once(':').map(|(h, _)| h).unwrap_or(&self.0)
    }

    /// Port component; 0 if the key does not parse.
    pub fn port(&self) -> u16 {
        self.0
            .rsplit_once(':')
            .and_then(|(_, p)| p.parse().ok())
            .unwrap_or(0)
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Liveness classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Online,
    Offline,
    Degraded,
    Unknown,
}

crate::simple_display! {
    NodeStatus {
        Online => "online",
        Offline => "offline",
        Degraded => "degraded",
        Unknown => "unknown",
    }
}

/// Utilization report returned by a node agent's `GET /status`.
///
/// Every field defaults so a sparse agent response still classifies the node
/// as online.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub total_memory: u64,
    #[serde(default)]
    pub available_memory: u64,
    #[serde(default)]
    pub running_processes: u32,
}

/// A registered node and its last observed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub host: String,
    pub port: u16,
    pub status: NodeStatus,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub total_memory: u64,
    pub available_memory: u64,
    pub running_processes: u32,
    pub last_seen: Option<DateTime<Utc>>,
}

impl NodeRecord {
    /// Fresh registration: status unknown, no observations yet.
    pub fn new(host: impl Into<String>, port: u16, registered_at: DateTime<Utc>) -> Self {
        Self {
            host: host.into(),
            port,
            status: NodeStatus::Unknown,
            cpu_usage: 0.0,
            memory_usage: 0.0,
            total_memory: 0,
            available_memory: 0,
            running_processes: 0,
            last_seen: Some(registered_at),
        }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::new(&self.host, self.port)
    }

    /// Apply a successful probe: mark online and absorb utilization.
    pub fn apply_report(&mut self, report: &StatusReport, at: DateTime<Utc>) {
        self.status = NodeStatus::Online;
        self.cpu_usage = report.cpu_usage;
        self.memory_usage = report.memory_usage;
        self.total_memory = report.total_memory;
        self.available_memory = report.available_memory;
        self.running_processes = report.running_processes;
        self.last_seen = Some(at);
    }

    /// A node is eligible for placement iff it is online and below the CPU
    /// threshold. This is the single definition of eligibility.
    pub fn is_eligible(&self, cpu_threshold: f64) -> bool {
        self.status == NodeStatus::Online && self.cpu_usage < cpu_threshold
    }
}

crate::builder! {
    pub struct NodeRecordBuilder => NodeRecord {
        into { host: String = "127.0.0.1" }
        set {
            port: u16 = 9001,
            status: NodeStatus = NodeStatus::Online,
            cpu_usage: f64 = 0.0,
            memory_usage: f64 = 0.0,
            total_memory: u64 = 0,
            available_memory: u64 = 0,
            running_processes: u32 = 0
        }
        option { last_seen: DateTime<Utc> }
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
