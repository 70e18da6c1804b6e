// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node registry: node identity → last observed liveness and utilization.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use herd_core::{NodeKey, NodeRecord, NodeStatus, StatusReport};
use parking_lot::Mutex;

/// Thread-safe mapping of node key to node record.
///
/// Nodes are never evicted; an offline status marks a node ineligible until
/// it answers a probe again.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: Mutex<HashMap<NodeKey, NodeRecord>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Idempotent: re-registering an existing node refreshes
    /// `last_seen` and keeps its observed status and utilization.
    pub fn register(&self, host: &str, port: u16, now: DateTime<Utc>) -> NodeKey {
        let key = NodeKey::new(host, port);
        let mut nodes = self.nodes.lock();
        match nodes.get_mut(&key) {
            Some(existing) => existing.last_seen = Some(now),
            None => {
                nodes.insert(key.clone(), NodeRecord::new(host, port, now));
            }
        }
        key
    }

    /// Snapshot of all records, ordered by node key.
    pub fn list(&self) -> Vec<NodeRecord> {
        let nodes = self.nodes.lock();
        let mut records: Vec<_> = nodes.values().cloned().collect();
        records.sort_by(|a, b| a.key().cmp(&b.key()));
        records
    }

    /// Snapshot of all keys, ordered. The probe pass iterates this.
    pub fn keys(&self) -> Vec<NodeKey> {
        let nodes = self.nodes.lock();
        let mut keys: Vec<_> = nodes.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get(&self, key: &NodeKey) -> Option<NodeRecord> {
        self.nodes.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.lock().is_empty()
    }

    /// Apply a successful probe result: online + fresh utilization.
    pub fn apply_report(&self, key: &NodeKey, report: &StatusReport, at: DateTime<Utc>) -> bool {
        let mut nodes = self.nodes.lock();
        match nodes.get_mut(key) {
            Some(node) => {
                node.apply_report(report, at);
                true
            }
            None => false,
        }
    }

    /// Transition a node to offline. Returns true only when the node exists
    /// and was not already offline, so the caller fires recovery exactly once
    /// per outage.
    pub fn mark_offline(&self, key: &NodeKey) -> bool {
        let mut nodes = self.nodes.lock();
        match nodes.get_mut(key) {
            Some(node) if node.status != NodeStatus::Offline => {
                node.status = NodeStatus::Offline;
                true
            }
            _ => false,
        }
    }

    /// Pick the eligible node with the lowest CPU utilization.
    ///
    /// Shared by initial placement and recovery. Ties break toward the
    /// smaller node key, which makes selection deterministic.
    pub fn select_eligible(&self, cpu_threshold: f64) -> Option<NodeKey> {
        let nodes = self.nodes.lock();
        nodes
            .iter()
            .filter(|(_, node)| node.is_eligible(cpu_threshold))
            .min_by(|(ka, a), (kb, b)| {
                a.cpu_usage
                    .partial_cmp(&b.cpu_usage)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| ka.cmp(kb))
            })
            .map(|(key, _)| key.clone())
    }
}

#[cfg(test)]
#[path = "nodes_tests.rs"]
mod tests;
