// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_entry_starts_running_with_zero_retries() {
    let entry = DesiredEntry::new(
        WorkloadId::from_string("wld-a"),
        "/bin/job",
        NodeKey::new("1.1.1.1", 9001),
        Utc::now(),
        DEFAULT_MAX_RETRIES,
    );
    assert_eq!(entry.status, DesiredStatus::Running);
    assert_eq!(entry.retry_count, 0);
    assert!(!entry.retries_exhausted());
}

#[yare::parameterized(
    fresh     = { 0, 3, false },
    last_try  = { 2, 3, false },
    at_cap    = { 3, 3, true },
    over_cap  = { 4, 3, true },
    zero_cap  = { 0, 0, true },
)]
fn exhaustion_boundary(retries: u32, cap: u32, exhausted: bool) {
    let entry = DesiredEntry::builder().retry_count(retries).max_retries(cap).build();
    assert_eq!(entry.retries_exhausted(), exhausted);
}

#[test]
fn entry_round_trips_through_json() {
    let entry = DesiredEntry::builder()
        .workload_id("wld-rt")
        .target_node("2.2.2.2:9002")
        .retry_count(1)
        .build();
    let json = serde_json::to_string(&entry).unwrap();
    let back: DesiredEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
    // Field names are part of the on-disk format
    assert!(json.contains("\"workload_id\""));
    assert!(json.contains("\"target_node\":\"2.2.2.2:9002\""));
    assert!(json.contains("\"status\":\"running\""));
}
