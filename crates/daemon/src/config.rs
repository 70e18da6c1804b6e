// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration: a flat record of every tunable.

use std::path::PathBuf;
use std::time::Duration;

use herd_core::DEFAULT_MAX_RETRIES;

/// All scheduler tunables in one flat record.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the control API listens on
    pub listen: String,
    /// Directory holding the state snapshot and lock file
    pub state_dir: PathBuf,
    /// Health monitor tick interval
    pub health_check_interval: Duration,
    /// Consecutive probe failures before a node goes offline
    pub failure_threshold: u32,
    /// Recovery engine cadence
    pub recovery_interval: Duration,
    /// Persistence flusher cadence
    pub persistence_interval: Duration,
    /// Recovery attempt cap per workload
    pub max_retries: u32,
    /// Timeout for `GET /status` probes
    pub status_timeout: Duration,
    /// Timeout for `POST /start` and `POST /stop`
    pub control_timeout: Duration,
    /// Nodes at or above this CPU utilization are ineligible for placement
    pub cpu_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:7070".to_string(),
            state_dir: PathBuf::from("."),
            health_check_interval: Duration::from_secs(3),
            failure_threshold: 2,
            recovery_interval: Duration::from_secs(1),
            persistence_interval: Duration::from_secs(30),
            max_retries: DEFAULT_MAX_RETRIES,
            status_timeout: Duration::from_secs(2),
            control_timeout: Duration::from_secs(10),
            cpu_threshold: 80.0,
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied (`HERD_*` variables).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(listen) = crate::env::listen_addr() {
            config.listen = listen;
        }
        if let Some(interval) = crate::env::health_interval() {
            config.health_check_interval = interval;
        }
        if let Some(interval) = crate::env::recovery_interval() {
            config.recovery_interval = interval;
        }
        if let Some(interval) = crate::env::persist_interval() {
            config.persistence_interval = interval;
        }
        if let Some(threshold) = crate::env::failure_threshold() {
            config.failure_threshold = threshold;
        }
        config
    }

    /// Canonical path of the desired-state snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join("state.json")
    }

    /// Path of the daemon's exclusive lock file.
    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join("herdd.lock")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
