// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_ids_carry_prefix_and_are_unique() {
    let a = WorkloadId::new();
    let b = WorkloadId::new();
    assert!(a.as_str().starts_with("wld-"));
    assert_eq!(a.as_str().len(), 23);
    assert_ne!(a, b);
}

#[test]
fn suffix_strips_prefix() {
    let id = WorkloadId::from_string("wld-abc123");
    assert_eq!(id.suffix(), "abc123");

    // Foreign IDs pass through unchanged
    let foreign = WorkloadId::from_string("workload_17");
    assert_eq!(foreign.suffix(), "workload_17");
}

#[test]
fn serde_is_transparent() {
    let id = WorkloadId::from_string("wld-roundtrip");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"wld-roundtrip\"");
    let back: WorkloadId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn borrow_allows_str_map_lookups() {
    use std::collections::HashMap;
    let mut map: HashMap<WorkloadId, u32> = HashMap::new();
    map.insert(WorkloadId::from_string("wld-x"), 7);
    assert_eq!(map.get("wld-x"), Some(&7));
}
