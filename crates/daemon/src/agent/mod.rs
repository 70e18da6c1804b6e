// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node-agent client.
//!
//! Every node runs an agent exposing three endpoints: `GET /status`
//! (utilization, 2xx iff alive), `POST /start` (spawn a script, returns the
//! pid), and `POST /stop` (kill a pid). The [`NodeAgent`] trait is the
//! daemon's only view of that surface; the health monitor, recovery engine,
//! and scheduler façade all hold an `Arc<dyn NodeAgent>` so tests can swap
//! in a scripted fake.

use std::time::Duration;

use async_trait::async_trait;
use herd_core::{NodeKey, StatusReport};
use thiserror::Error;

use crate::config::Config;
use crate::http::{self, HttpError};

#[cfg(test)]
pub(crate) mod fake;

/// Errors from node-agent calls. Transport failures and non-2xx responses
/// are equivalent for classification purposes; both count as failed probes
/// and failed attempts.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),
    #[error("node returned HTTP {0}")]
    Status(u16),
    #[error("invalid response from node: {0}")]
    InvalidResponse(String),
}

/// Client interface to a remote node agent.
#[async_trait]
pub trait NodeAgent: Send + Sync {
    /// Probe `GET /status`. 2xx with a utilization report means alive.
    async fn status(&self, node: &NodeKey) -> Result<StatusReport, AgentError>;

    /// `POST /start` with the script path. Returns the spawned pid when the
    /// agent reports one.
    async fn start(&self, node: &NodeKey, script_path: &str) -> Result<Option<u32>, AgentError>;

    /// `POST /stop` for a pid previously returned by `start`.
    async fn stop(&self, node: &NodeKey, pid: u32) -> Result<(), AgentError>;
}

/// Production client speaking plain HTTP to node agents.
pub struct HttpNodeAgent {
    status_timeout: Duration,
    control_timeout: Duration,
}

impl HttpNodeAgent {
    pub fn new(config: &Config) -> Self {
        Self {
            status_timeout: config.status_timeout,
            control_timeout: config.control_timeout,
        }
    }
}

#[async_trait]
impl NodeAgent for HttpNodeAgent {
    async fn status(&self, node: &NodeKey) -> Result<StatusReport, AgentError> {
        let response = http::get(node.addr(), "/status", self.status_timeout).await?;
        if !response.is_success() {
            return Err(AgentError::Status(response.status));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))
    }

    async fn start(&self, node: &NodeKey, script_path: &str) -> Result<Option<u32>, AgentError> {
        let body = serde_json::json!({ "script_path": script_path }).to_string();
        let response = http::post(node.addr(), "/start", &body, self.control_timeout).await?;
        if !response.is_success() {
            return Err(AgentError::Status(response.status));
        }

        // Tolerate agents that omit the pid; the workload still started.
        let pid = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|v| v.get("pid").and_then(|p| p.as_u64()))
            .and_then(|p| u32::try_from(p).ok());
        Ok(pid)
    }

    async fn stop(&self, node: &NodeKey, pid: u32) -> Result<(), AgentError> {
        let body = serde_json::json!({ "pid": pid }).to_string();
        let response = http::post(node.addr(), "/stop", &body, self.control_timeout).await?;
        if !response.is_success() {
            return Err(AgentError::Status(response.status));
        }
        Ok(())
    }
}
