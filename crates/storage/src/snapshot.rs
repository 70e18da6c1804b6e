// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence for the desired-state table.
//!
//! One self-describing JSON document holds the full table. Writes go to a
//! temporary path followed by a single atomic rename, so the canonical path
//! always contains a valid serialized form of some past table. A snapshot
//! that fails to parse at load time is moved aside to a rotated `.bak` path
//! for post-mortem and the caller starts from an empty table.

use chrono::{DateTime, Utc};
use herd_core::DesiredEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur in snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The desired-state table at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Schema version for migrations
    #[serde(rename = "v")]
    pub version: u32,
    /// When this snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Every desired-state entry, terminal ones included
    pub workloads: Vec<DesiredEntry>,
}

impl StateSnapshot {
    pub fn new(timestamp: DateTime<Utc>, workloads: Vec<DesiredEntry>) -> Self {
        Self {
            version: CURRENT_SNAPSHOT_VERSION,
            timestamp,
            workloads,
        }
    }
}

/// Write a snapshot atomically: serialize to `<path>.tmp`, then rename over
/// the canonical path.
pub fn write_snapshot(path: &Path, snapshot: &StateSnapshot) -> Result<(), SnapshotError> {
    let data = serde_json::to_vec_pretty(snapshot)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load the snapshot at `path`.
///
/// Returns `Ok(None)` when no snapshot exists (clean first boot). A corrupt
/// or unreadable snapshot is quarantined to a `.bak` path and reported as an
/// error; the caller is expected to continue with an empty table.
pub fn load_snapshot(path: &Path) -> Result<Option<StateSnapshot>, SnapshotError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&data) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) => {
            quarantine(path);
            Err(e.into())
        }
    }
}

/// Move a corrupt snapshot aside so the next boot starts clean while the
/// bytes stay on disk for inspection.
fn quarantine(path: &Path) {
    let bak = rotate_bak_path(path);
    match fs::rename(path, &bak) {
        Ok(()) => warn!(from = %path.display(), to = %bak.display(), "quarantined corrupt snapshot"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to quarantine corrupt snapshot"),
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
/// The oldest backup is removed when the limit is reached.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

fn tmp_path(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
