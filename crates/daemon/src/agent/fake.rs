// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted in-memory node agent for tests.
//!
//! Behavior is configured per node and sticky until changed, so a test can
//! flip a node from healthy to failing between monitor ticks. Every call is
//! recorded for assertions.

use std::collections::HashMap;

use async_trait::async_trait;
use herd_core::{NodeKey, StatusReport};
use parking_lot::Mutex;

use super::{AgentError, NodeAgent};
use crate::http::HttpError;

/// A call observed by the fake, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCall {
    Status(NodeKey),
    Start(NodeKey, String),
    Stop(NodeKey, u32),
}

#[derive(Clone)]
enum StatusScript {
    Healthy(StatusReport),
    /// Connection-refused semantics
    Unreachable,
    /// Answers, but with an error status
    HttpError(u16),
}

#[derive(Clone)]
enum StartScript {
    Succeed(Option<u32>),
    Fail,
}

#[derive(Default)]
pub struct FakeNodeAgent {
    statuses: Mutex<HashMap<NodeKey, StatusScript>>,
    starts: Mutex<HashMap<NodeKey, StartScript>>,
    stop_failures: Mutex<HashMap<NodeKey, bool>>,
    calls: Mutex<Vec<AgentCall>>,
}

impl FakeNodeAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node answers `/status` with 2xx and the given CPU utilization.
    pub fn set_healthy(&self, node: &NodeKey, cpu_usage: f64) {
        let report = StatusReport {
            cpu_usage,
            memory_usage: 40.0,
            total_memory: 8192,
            available_memory: 4096,
            running_processes: 1,
        };
        self.statuses.lock().insert(node.clone(), StatusScript::Healthy(report));
    }

    /// Node stops answering `/status` entirely.
    pub fn set_unreachable(&self, node: &NodeKey) {
        self.statuses.lock().insert(node.clone(), StatusScript::Unreachable);
    }

    /// Node answers `/status` with an error code.
    pub fn set_http_error(&self, node: &NodeKey, status: u16) {
        self.statuses.lock().insert(node.clone(), StatusScript::HttpError(status));
    }

    /// `/start` on this node succeeds, reporting `pid`.
    pub fn set_start_ok(&self, node: &NodeKey, pid: u32) {
        self.starts.lock().insert(node.clone(), StartScript::Succeed(Some(pid)));
    }

    /// `/start` on this node fails.
    pub fn set_start_failing(&self, node: &NodeKey) {
        self.starts.lock().insert(node.clone(), StartScript::Fail);
    }

    /// `/stop` on this node fails.
    pub fn set_stop_failing(&self, node: &NodeKey) {
        self.stop_failures.lock().insert(node.clone(), true);
    }

    pub fn calls(&self) -> Vec<AgentCall> {
        self.calls.lock().clone()
    }

    /// Number of `/start` calls issued to `node` for `script_path`.
    pub fn start_count(&self, node: &NodeKey, script_path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, AgentCall::Start(n, s) if n == node && s == script_path))
            .count()
    }
}

#[async_trait]
impl NodeAgent for FakeNodeAgent {
    async fn status(&self, node: &NodeKey) -> Result<StatusReport, AgentError> {
        self.calls.lock().push(AgentCall::Status(node.clone()));
        let script = self.statuses.lock().get(node).cloned();
        match script {
            Some(StatusScript::Healthy(report)) => Ok(report),
            Some(StatusScript::HttpError(status)) => Err(AgentError::Status(status)),
            Some(StatusScript::Unreachable) | None => Err(AgentError::Transport(
                HttpError::Connect(std::io::Error::from(std::io::ErrorKind::ConnectionRefused)),
            )),
        }
    }

    async fn start(&self, node: &NodeKey, script_path: &str) -> Result<Option<u32>, AgentError> {
        self.calls
            .lock()
            .push(AgentCall::Start(node.clone(), script_path.to_string()));
        let script = self.starts.lock().get(node).cloned();
        match script {
            Some(StartScript::Succeed(pid)) => Ok(pid),
            Some(StartScript::Fail) | None => Err(AgentError::Status(500)),
        }
    }

    async fn stop(&self, node: &NodeKey, pid: u32) -> Result<(), AgentError> {
        self.calls.lock().push(AgentCall::Stop(node.clone(), pid));
        if self.stop_failures.lock().get(node).copied().unwrap_or(false) {
            return Err(AgentError::Status(500));
        }
        Ok(())
    }
}
