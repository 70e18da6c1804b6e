// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ANSI color helpers for table output.

use std::io::IsTerminal;

use herd_core::{NodeStatus, WorkloadStatus};

pub mod codes {
    /// Section headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Healthy / running
    pub const OK: u8 = 114;
    /// Failed / offline
    pub const ERR: u8 = 167;
    /// Pending / stopped / in-between states
    pub const WARN: u8 = 179;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Wrap `text` in a 256-color escape when `enabled`; pure so tests can force
/// either mode.
pub fn paint(code: u8, text: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[38;5;{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Color a node status with the conventional palette.
pub fn node_status(status: NodeStatus, enabled: bool) -> String {
    let code = match status {
        NodeStatus::Online => codes::OK,
        NodeStatus::Offline => codes::ERR,
        NodeStatus::Degraded | NodeStatus::Unknown => codes::WARN,
    };
    paint(code, &status.to_string(), enabled)
}

/// Color a workload status with the conventional palette.
pub fn workload_status(status: WorkloadStatus, enabled: bool) -> String {
    let code = match status {
        WorkloadStatus::Running => codes::OK,
        WorkloadStatus::Failed => codes::ERR,
        WorkloadStatus::Pending | WorkloadStatus::Stopped => codes::WARN,
    };
    paint(code, &status.to_string(), enabled)
}

/// Format text with the header color.
pub fn header(text: &str, enabled: bool) -> String {
    paint(codes::HEADER, text, enabled)
}
