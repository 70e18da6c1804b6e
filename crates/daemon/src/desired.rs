// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired-state table and the pending-recovery set.
//!
//! One mutex guards both structures, so membership in the pending set and
//! the state of the entry it refers to can never disagree: an observer
//! either sees a workload pending with its old target, or recovered with its
//! new target, never a mix of the two. Every public method is a single
//! critical section.
//!
//! Invariant: the pending set is always a subset of the table's keys.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use herd_core::{DesiredEntry, DesiredStatus, NodeKey, WorkloadId};
use parking_lot::Mutex;

#[derive(Default)]
struct Inner {
    entries: HashMap<WorkloadId, DesiredEntry>,
    pending_recovery: HashSet<WorkloadId>,
}

/// What the recovery engine should do with a pending workload.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptDisposition {
    /// Attempt a `/start`; carries the script path for the request body.
    Proceed { script_path: String },
    /// Entry vanished (unregistered mid-flight); dropped from the pending set.
    Dropped,
    /// Retry budget spent; entry is now terminally failed.
    Exhausted,
}

/// Result of recording a finished recovery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Re-placed; desired target updated, no longer pending.
    Recovered,
    /// Attempt failed; still pending for the next cycle.
    RetryLater,
    /// Attempt failed and spent the budget; terminally failed.
    Exhausted,
    /// Entry vanished before the result landed.
    Gone,
}

/// The authoritative declaration of where each workload ought to run.
#[derive(Default)]
pub struct DesiredStateTable {
    inner: Mutex<Inner>,
}

impl DesiredStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a newly placed workload: status running, zero retries.
    pub fn register(
        &self,
        id: WorkloadId,
        script_path: &str,
        target: NodeKey,
        now: DateTime<Utc>,
        max_retries: u32,
    ) {
        let entry = DesiredEntry::new(id.clone(), script_path, target, now, max_retries);
        self.inner.lock().entries.insert(id, entry);
    }

    /// Drop a workload from the table and, if present, the pending set.
    pub fn unregister(&self, id: &WorkloadId) -> bool {
        let mut inner = self.inner.lock();
        inner.pending_recovery.remove(id);
        inner.entries.remove(id).is_some()
    }

    /// Union ids into the pending set. Only ids that exist in the table with
    /// status running are admitted.
    pub fn mark_for_recovery<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = WorkloadId>,
    {
        let mut inner = self.inner.lock();
        let mut added = 0;
        for id in ids {
            let admitted = matches!(
                inner.entries.get(&id),
                Some(entry) if entry.status == DesiredStatus::Running
            );
            if admitted && inner.pending_recovery.insert(id) {
                added += 1;
            }
        }
        added
    }

    /// Queue every running workload whose desired target is `node`.
    ///
    /// Called by the health monitor when it transitions a node offline; the
    /// enumeration and the union happen under one lock so a concurrent
    /// re-placement cannot be re-queued against its old node.
    pub fn mark_node_for_recovery(&self, node: &NodeKey) -> Vec<WorkloadId> {
        let mut inner = self.inner.lock();
        let affected: Vec<WorkloadId> = inner
            .entries
            .values()
            .filter(|e| e.target_node == *node && e.status == DesiredStatus::Running)
            .map(|e| e.workload_id.clone())
            .collect();
        for id in &affected {
            inner.pending_recovery.insert(id.clone());
        }
        affected
    }

    /// Gate a recovery attempt for `id`.
    ///
    /// Checks existence and the retry budget under the lock and hands back
    /// the script path, so the caller can issue the `/start` without holding
    /// anything.
    pub fn begin_attempt(&self, id: &WorkloadId) -> AttemptDisposition {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let disposition = match inner.entries.get_mut(id) {
            None => AttemptDisposition::Dropped,
            Some(entry) if entry.retries_exhausted() => {
                entry.status = DesiredStatus::Failed;
                AttemptDisposition::Exhausted
            }
            Some(entry) => {
                return AttemptDisposition::Proceed {
                    script_path: entry.script_path.clone(),
                }
            }
        };
        inner.pending_recovery.remove(id);
        disposition
    }

    /// Record the result of a recovery attempt.
    ///
    /// Success moves the desired target to `new_target`, keeps status
    /// running, and leaves the pending set, all in one critical section.
    /// `retry_count` increments either way, so even always-successful
    /// recoveries are bounded.
    pub fn record_attempt(
        &self,
        id: &WorkloadId,
        success: bool,
        new_target: Option<&NodeKey>,
    ) -> AttemptOutcome {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let Some(entry) = inner.entries.get_mut(id) else {
            inner.pending_recovery.remove(id);
            return AttemptOutcome::Gone;
        };

        entry.retry_count += 1;
        if success {
            if let Some(target) = new_target {
                entry.target_node = target.clone();
            }
            entry.status = DesiredStatus::Running;
            inner.pending_recovery.remove(id);
            AttemptOutcome::Recovered
        } else if entry.retry_count > entry.max_retries {
            entry.status = DesiredStatus::Failed;
            inner.pending_recovery.remove(id);
            AttemptOutcome::Exhausted
        } else {
            AttemptOutcome::RetryLater
        }
    }

    /// Consistent copy of the table, ordered by workload id.
    pub fn snapshot(&self) -> Vec<DesiredEntry> {
        let inner = self.inner.lock();
        let mut entries: Vec<_> = inner.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.workload_id.cmp(&b.workload_id));
        entries
    }

    /// Replace the table contents from a loaded snapshot. Startup only; the
    /// pending set starts empty and repopulates from live probes.
    pub fn load(&self, entries: Vec<DesiredEntry>) {
        let mut inner = self.inner.lock();
        inner.pending_recovery.clear();
        inner.entries = entries
            .into_iter()
            .map(|e| (e.workload_id.clone(), e))
            .collect();
    }

    pub fn get(&self, id: &WorkloadId) -> Option<DesiredEntry> {
        self.inner.lock().entries.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Ordered snapshot of the pending-recovery set.
    pub fn pending(&self) -> Vec<WorkloadId> {
        let inner = self.inner.lock();
        let mut ids: Vec<_> = inner.pending_recovery.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending_recovery.len()
    }
}

#[cfg(test)]
#[path = "desired_tests.rs"]
mod tests;
