// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: HERD_STATE_DIR > XDG_STATE_HOME/herd > ~/.local/state/herd
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("HERD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("herd"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/herd"))
}

/// Listen address override for the control API.
pub fn listen_addr() -> Option<String> {
    std::env::var("HERD_LISTEN").ok().filter(|s| !s.is_empty())
}

/// Health monitor tick interval override.
pub fn health_interval() -> Option<Duration> {
    duration_ms("HERD_HEALTH_INTERVAL_MS")
}

/// Recovery engine cadence override.
pub fn recovery_interval() -> Option<Duration> {
    duration_ms("HERD_RECOVERY_INTERVAL_MS")
}

/// Persistence flusher cadence override.
pub fn persist_interval() -> Option<Duration> {
    duration_ms("HERD_PERSIST_INTERVAL_MS")
}

/// Consecutive-failure threshold override.
pub fn failure_threshold() -> Option<u32> {
    std::env::var("HERD_FAILURE_THRESHOLD").ok().and_then(|s| s.parse().ok())
}

fn duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}
