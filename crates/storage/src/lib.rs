// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for the herd scheduler: durable snapshots of the
//! desired-state table.

mod snapshot;

pub use snapshot::{
    load_snapshot, write_snapshot, SnapshotError, StateSnapshot, CURRENT_SNAPSHOT_VERSION,
};
