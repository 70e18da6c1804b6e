// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_workload_starts_pending_with_placement() {
    let id = WorkloadId::from_string("wld-t1");
    let w = WorkloadRecord::new(id.clone(), "/bin/job1", "1.1.1.1", 9001);
    assert_eq!(w.id, id);
    assert_eq!(w.status, WorkloadStatus::Pending);
    assert_eq!(w.node_key().addr(), "1.1.1.1:9001");
    assert!(w.pid.is_none());
    assert!(w.start_time.is_none());
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&WorkloadStatus::Running).unwrap(), "\"running\"");
    assert_eq!(WorkloadStatus::Stopped.to_string(), "stopped");
}
