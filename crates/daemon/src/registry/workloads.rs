// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workload registry: workload id → record and current placement.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use herd_core::{WorkloadId, WorkloadRecord, WorkloadStatus};
use parking_lot::Mutex;

/// Thread-safe mapping of workload id to workload record.
#[derive(Default)]
pub struct WorkloadRegistry {
    workloads: Mutex<HashMap<WorkloadId, WorkloadRecord>>,
}

impl WorkloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: WorkloadRecord) {
        self.workloads.lock().insert(record.id.clone(), record);
    }

    pub fn remove(&self, id: &WorkloadId) -> Option<WorkloadRecord> {
        self.workloads.lock().remove(id)
    }

    /// Snapshot of all records, ordered by id.
    pub fn list(&self) -> Vec<WorkloadRecord> {
        let workloads = self.workloads.lock();
        let mut records: Vec<_> = workloads.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub fn get(&self, id: &WorkloadId) -> Option<WorkloadRecord> {
        self.workloads.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.workloads.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.workloads.lock().is_empty()
    }

    /// Acknowledge a successful initial `/start`: pid, running, start time.
    pub fn mark_started(&self, id: &WorkloadId, pid: Option<u32>, at: DateTime<Utc>) -> bool {
        let mut workloads = self.workloads.lock();
        match workloads.get_mut(id) {
            Some(w) => {
                w.pid = pid;
                w.status = WorkloadStatus::Running;
                w.start_time = Some(at);
                true
            }
            None => false,
        }
    }

    /// Move a workload to a new node after re-placement.
    pub fn update_placement(&self, id: &WorkloadId, host: &str, port: u16, pid: Option<u32>) -> bool {
        let mut workloads = self.workloads.lock();
        match workloads.get_mut(id) {
            Some(w) => {
                w.node_host = host.to_string();
                w.node_port = port;
                w.pid = pid;
                true
            }
            None => false,
        }
    }

    pub fn update_status(
        &self,
        id: &WorkloadId,
        status: WorkloadStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> bool {
        let mut workloads = self.workloads.lock();
        match workloads.get_mut(id) {
            Some(w) => {
                w.status = status;
                if end_time.is_some() {
                    w.end_time = end_time;
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "workloads_tests.rs"]
mod tests;
