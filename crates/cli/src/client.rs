// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed client for the scheduler's control API.

use std::time::Duration;

use herd_core::{NodeRecord, WorkloadRecord};
use herd_daemon::http::{self, HttpError, HttpResponse};
use herd_daemon::{HealthResponse, HealthSummary, MessageResponse, RecoveryMetrics, SubmitResponse};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot connect to scheduler at {addr}: {source}")]
    Transport {
        addr: String,
        #[source]
        source: HttpError,
    },
    /// The scheduler answered with an error status; carries its message.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("invalid response from scheduler: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct SchedulerClient {
    addr: String,
    timeout: Duration,
}

impl SchedulerClient {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            timeout: Duration::from_secs(15),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.decode(http::get(&self.addr, "/health", self.timeout).await)
    }

    pub async fn nodes(&self) -> Result<Vec<NodeRecord>, ClientError> {
        self.decode(http::get(&self.addr, "/nodes", self.timeout).await)
    }

    pub async fn register_node(&self, host: &str, port: u16) -> Result<MessageResponse, ClientError> {
        let body = serde_json::json!({ "host": host, "port": port }).to_string();
        self.decode(http::post(&self.addr, "/nodes", &body, self.timeout).await)
    }

    pub async fn workloads(&self) -> Result<Vec<WorkloadRecord>, ClientError> {
        self.decode(http::get(&self.addr, "/workloads", self.timeout).await)
    }

    pub async fn submit(&self, script_path: &str) -> Result<SubmitResponse, ClientError> {
        let body = serde_json::json!({ "script_path": script_path }).to_string();
        self.decode(http::post(&self.addr, "/workloads", &body, self.timeout).await)
    }

    pub async fn stop(&self, workload_id: &str) -> Result<MessageResponse, ClientError> {
        let path = format!("/workloads/{workload_id}");
        self.decode(http::delete(&self.addr, &path, self.timeout).await)
    }

    pub async fn health_summary(&self) -> Result<HealthSummary, ClientError> {
        self.decode(http::get(&self.addr, "/health/summary", self.timeout).await)
    }

    pub async fn force_check(&self) -> Result<HealthSummary, ClientError> {
        self.decode(http::post(&self.addr, "/health/check", "{}", self.timeout).await)
    }

    pub async fn recovery_metrics(&self) -> Result<RecoveryMetrics, ClientError> {
        self.decode(http::get(&self.addr, "/recovery/metrics", self.timeout).await)
    }

    /// Map a transport result into a typed body, surfacing the server's
    /// `error` field on non-2xx responses.
    fn decode<T: DeserializeOwned>(
        &self,
        result: Result<HttpResponse, HttpError>,
    ) -> Result<T, ClientError> {
        let response = result.map_err(|source| ClientError::Transport {
            addr: self.addr.clone(),
            source,
        })?;
        if !response.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&response.body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("scheduler returned HTTP {}", response.status));
            return Err(ClientError::Api {
                status: response.status,
                message,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}
