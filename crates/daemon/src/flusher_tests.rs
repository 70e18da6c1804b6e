// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::stack_with;
use herd_storage::load_snapshot;

#[tokio::test]
async fn flush_writes_loadable_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        state_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let s = stack_with(config.clone());
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    s.agent.set_start_ok(&a, 9);
    let (id, _) = s.scheduler.submit("/bin/job").await.unwrap();

    let flusher = Flusher::new(Arc::clone(&s.desired), s.clock.clone(), &config);
    flusher.flush_once();

    let snapshot = load_snapshot(&config.snapshot_path()).unwrap().unwrap();
    assert_eq!(snapshot.workloads.len(), 1);
    assert_eq!(snapshot.workloads[0].workload_id, id);
    assert_eq!(snapshot.workloads[0].script_path, "/bin/job");
    assert_eq!(snapshot.workloads[0].target_node, a);
    assert_eq!(snapshot.timestamp, s.clock.utc_now());
}

#[tokio::test]
async fn flush_failure_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    // Point the snapshot at a directory that does not exist
    let config = Config {
        state_dir: dir.path().join("missing").join("deeper"),
        ..Config::default()
    };
    let s = stack_with(config.clone());

    let flusher = Flusher::new(Arc::clone(&s.desired), s.clock.clone(), &config);
    // Must not panic; the loop retries next tick
    flusher.flush_once();
    assert!(!config.snapshot_path().exists());
}

#[tokio::test]
async fn loaded_snapshot_round_trips_through_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        state_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let s = stack_with(config.clone());
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    s.agent.set_start_ok(&a, 9);
    s.scheduler.submit("/bin/one").await.unwrap();
    s.scheduler.submit("/bin/two").await.unwrap();

    let flusher = Flusher::new(Arc::clone(&s.desired), s.clock.clone(), &config);
    flusher.flush_once();

    // A fresh table seeded from disk matches the original
    let restored = crate::desired::DesiredStateTable::new();
    let snapshot = load_snapshot(&config.snapshot_path()).unwrap().unwrap();
    restored.load(snapshot.workloads);
    assert_eq!(restored.snapshot(), s.desired.snapshot());
    assert_eq!(restored.pending_len(), 0);
}
