// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::agent::fake::AgentCall;
use crate::desired::AttemptDisposition;
use crate::test_support::stack;
use herd_core::{DesiredStatus, NodeStatus, WorkloadStatus};

#[tokio::test]
async fn empty_pending_set_is_a_no_op() {
    let s = stack();
    s.online_node("1.1.1.1", 9001, 10.0).await;
    let calls_before = s.agent.calls().len();

    s.recovery.process_once().await;
    assert_eq!(s.agent.calls().len(), calls_before);
}

#[tokio::test]
async fn recovers_onto_least_loaded_eligible_node() {
    let s = stack();
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    let b = s.online_node("2.2.2.2", 9002, 30.0).await;
    let c = s.online_node("3.3.3.3", 9003, 90.0).await; // over threshold
    s.agent.set_start_ok(&a, 100);
    s.agent.set_start_ok(&b, 200);
    let (id, _) = s.scheduler.submit("/bin/j").await.unwrap();

    // A fails; B is the healthiest eligible target (C is over the cap)
    s.agent.set_unreachable(&a);
    s.monitor.check_all().await;
    s.monitor.check_all().await;
    s.recovery.process_once().await;

    assert_eq!(s.agent.start_count(&b, "/bin/j"), 1);
    assert_eq!(s.agent.start_count(&c, "/bin/j"), 0);

    let entry = s.desired.get(&id).unwrap();
    assert_eq!(entry.target_node, b);
    assert_eq!(entry.status, DesiredStatus::Running);
    assert_eq!(entry.retry_count, 1);
    assert_eq!(s.desired.pending_len(), 0);

    // Workload registry reflects the new placement
    let w = s.workloads.get(&id).unwrap();
    assert_eq!(w.node_key(), b);
    assert_eq!(w.pid, Some(200));
    assert_eq!(w.status, WorkloadStatus::Running);
}

#[tokio::test]
async fn no_eligible_node_leaves_pending_untouched() {
    let s = stack();
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    s.agent.set_start_ok(&a, 100);
    let (id, _) = s.scheduler.submit("/bin/j").await.unwrap();

    s.agent.set_unreachable(&a);
    s.monitor.check_all().await;
    s.monitor.check_all().await;
    assert_eq!(s.nodes.get(&a).unwrap().status, NodeStatus::Offline);

    s.recovery.process_once().await;

    // Nothing attempted, nothing consumed
    assert_eq!(s.desired.pending(), vec![id.clone()]);
    assert_eq!(s.desired.get(&id).unwrap().retry_count, 0);
    assert!(!s.agent.calls().iter().any(|c| matches!(c, AgentCall::Start(..))));
}

#[tokio::test]
async fn failed_attempts_eventually_exhaust() {
    let s = stack();
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    let b = s.online_node("2.2.2.2", 9002, 30.0).await;
    s.agent.set_start_ok(&a, 100);
    s.agent.set_start_failing(&b);
    let (id, _) = s.scheduler.submit("/bin/j").await.unwrap();

    s.agent.set_unreachable(&a);
    s.monitor.check_all().await;
    s.monitor.check_all().await;

    // max_retries = 3: three failing attempts spend the budget
    for expected in 1..=3u32 {
        s.recovery.process_once().await;
        assert_eq!(s.desired.get(&id).unwrap().retry_count, expected);
    }
    assert_eq!(s.desired.pending(), vec![id.clone()]);

    // Fourth pass hits the exhaustion gate without another /start
    s.recovery.process_once().await;
    let entry = s.desired.get(&id).unwrap();
    assert_eq!(entry.status, DesiredStatus::Failed);
    assert_eq!(s.desired.pending_len(), 0);
    assert_eq!(s.agent.start_count(&b, "/bin/j"), 3);
}

#[tokio::test]
async fn start_attempts_never_exceed_budget_plus_initial() {
    let s = stack();
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    let b = s.online_node("2.2.2.2", 9002, 30.0).await;
    s.agent.set_start_ok(&a, 100);
    s.agent.set_start_failing(&b);
    let (_id, _) = s.scheduler.submit("/bin/j").await.unwrap();

    s.agent.set_unreachable(&a);
    s.monitor.check_all().await;
    s.monitor.check_all().await;

    for _ in 0..10 {
        s.recovery.process_once().await;
    }

    // Initial placement on A plus max_retries attempts on B
    let total_starts = s.agent.start_count(&a, "/bin/j") + s.agent.start_count(&b, "/bin/j");
    assert_eq!(total_starts, 1 + 3);
}

#[tokio::test]
async fn vanished_entry_is_dropped_from_pending() {
    let s = stack();
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    let b = s.online_node("2.2.2.2", 9002, 30.0).await;
    s.agent.set_start_ok(&a, 100);
    s.agent.set_start_ok(&b, 200);
    let (id, _) = s.scheduler.submit("/bin/j").await.unwrap();

    s.agent.set_unreachable(&a);
    s.monitor.check_all().await;
    s.monitor.check_all().await;

    // Operator stops the workload while it is pending: the entry goes away,
    // unregister clears pending, and a later stale mark resolves to Dropped
    s.desired.unregister(&id);
    s.desired.mark_for_recovery([id.clone()]);
    assert_eq!(s.desired.begin_attempt(&id), AttemptDisposition::Dropped);

    s.recovery.process_once().await;
    assert_eq!(s.desired.pending_len(), 0);
    assert_eq!(s.agent.start_count(&b, "/bin/j"), 0);
}

#[tokio::test]
async fn drains_multiple_workloads_in_one_pass() {
    let s = stack();
    let a = s.online_node("1.1.1.1", 9001, 10.0).await;
    let b = s.online_node("2.2.2.2", 9002, 30.0).await;
    s.agent.set_start_ok(&a, 100);
    s.agent.set_start_ok(&b, 200);
    let (id1, _) = s.scheduler.submit("/bin/one").await.unwrap();
    let (id2, _) = s.scheduler.submit("/bin/two").await.unwrap();

    s.agent.set_unreachable(&a);
    s.monitor.check_all().await;
    s.monitor.check_all().await;
    assert_eq!(s.desired.pending_len(), 2);

    s.recovery.process_once().await;

    assert_eq!(s.desired.pending_len(), 0);
    assert_eq!(s.desired.get(&id1).unwrap().target_node, b);
    assert_eq!(s.desired.get(&id2).unwrap().target_node, b);
    assert_eq!(s.agent.start_count(&b, "/bin/one"), 1);
    assert_eq!(s.agent.start_count(&b, "/bin/two"), 1);
}
