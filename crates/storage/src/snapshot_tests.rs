// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use herd_core::DesiredStatus;
use proptest::prelude::*;

fn sample_entries() -> Vec<DesiredEntry> {
    vec![
        DesiredEntry::builder()
            .workload_id("wld-aaaa")
            .script_path("/bin/job1")
            .target_node("1.1.1.1:9001")
            .created_at(Utc.timestamp_opt(1_750_000_000, 0).single().unwrap())
            .build(),
        DesiredEntry::builder()
            .workload_id("wld-bbbb")
            .script_path("/bin/job2")
            .target_node("2.2.2.2:9002")
            .status(DesiredStatus::Failed)
            .retry_count(3)
            .created_at(Utc.timestamp_opt(1_750_000_100, 0).single().unwrap())
            .build(),
    ]
}

#[test]
fn missing_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_snapshot(&dir.path().join("state.json")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn write_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let taken = Utc.timestamp_opt(1_750_000_000, 0).single().unwrap();

    let snapshot = StateSnapshot::new(taken, sample_entries());
    write_snapshot(&path, &snapshot).unwrap();

    let loaded = load_snapshot(&path).unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.version, CURRENT_SNAPSHOT_VERSION);
}

#[test]
fn write_leaves_no_tmp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    write_snapshot(&path, &StateSnapshot::new(Utc::now(), vec![])).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn rewrite_replaces_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    write_snapshot(&path, &StateSnapshot::new(Utc::now(), sample_entries())).unwrap();
    write_snapshot(&path, &StateSnapshot::new(Utc::now(), vec![])).unwrap();

    let loaded = load_snapshot(&path).unwrap().unwrap();
    assert!(loaded.workloads.is_empty());
}

#[test]
fn corrupt_snapshot_is_quarantined() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{\"v\": 1, \"workloads\": [trunca").unwrap();

    assert!(load_snapshot(&path).is_err());

    // Original moved aside; next load sees a clean slate
    assert!(!path.exists());
    assert!(path.with_extension("bak").exists());
    assert!(load_snapshot(&path).unwrap().is_none());
}

#[test]
fn repeated_quarantine_rotates_backups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    std::fs::write(&path, "first corrupt").unwrap();
    assert!(load_snapshot(&path).is_err());
    std::fs::write(&path, "second corrupt").unwrap();
    assert!(load_snapshot(&path).is_err());

    // Newest corruption lands in .bak, older shifts to .bak.2
    assert_eq!(std::fs::read_to_string(path.with_extension("bak")).unwrap(), "second corrupt");
    assert_eq!(std::fs::read_to_string(path.with_extension("bak.2")).unwrap(), "first corrupt");
}

fn entry_strategy() -> impl Strategy<Value = DesiredEntry> {
    (
        "[a-z0-9]{8}",
        "[a-z]{1,12}",
        1u8..=254,
        1024u16..=65000,
        any::<bool>(),
        0u32..=5,
        0u32..=5,
        0i64..=1_800_000_000,
    )
        .prop_map(|(suffix, script, octet, port, failed, retries, cap, secs)| {
            DesiredEntry::builder()
                .workload_id(format!("wld-{suffix}"))
                .script_path(format!("/bin/{script}"))
                .target_node(format!("10.0.0.{octet}:{port}"))
                .status(if failed { DesiredStatus::Failed } else { DesiredStatus::Running })
                .created_at(Utc.timestamp_opt(secs, 0).single().unwrap())
                .retry_count(retries)
                .max_retries(cap)
                .build()
        })
}

proptest! {
    // Snapshot → disk → snapshot preserves every entry field.
    #[test]
    fn snapshot_round_trip(entries in prop::collection::vec(entry_strategy(), 0..16)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let snapshot = StateSnapshot::new(
            Utc.timestamp_opt(1_750_000_000, 0).single().unwrap(),
            entries,
        );

        write_snapshot(&path, &snapshot).unwrap();
        let loaded = load_snapshot(&path).unwrap().unwrap();
        prop_assert_eq!(loaded, snapshot);
    }
}
