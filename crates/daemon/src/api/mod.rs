// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP control API.
//!
//! Thin adapters over the scheduler façade: each handler validates the
//! body, calls one façade method, and maps the result to the documented
//! status code. Field validation happens here so `MISSING_FIELD` never
//! reaches the façade, which takes typed arguments.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::scheduler::{Scheduler, SchedulerError};
use herd_core::{NodeRecord, WorkloadId, WorkloadRecord};
use types::{ErrorResponse, HealthResponse, HealthSummary, MessageResponse, RecoveryMetrics, SubmitResponse};

/// Shared handler context.
#[derive(Clone)]
pub struct ApiCtx {
    pub scheduler: Arc<Scheduler>,
}

/// Errors a handler can surface, with their HTTP mapping.
#[derive(Debug)]
pub enum ApiError {
    MissingField(&'static str),
    Scheduler(SchedulerError),
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        ApiError::Scheduler(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::MissingField(field) => {
                (StatusCode::BAD_REQUEST, format!("Missing {field}"))
            }
            ApiError::Scheduler(err) => {
                let status = match err {
                    SchedulerError::NoAvailableNodes => StatusCode::SERVICE_UNAVAILABLE,
                    SchedulerError::NotFound(_) => StatusCode::NOT_FOUND,
                    SchedulerError::StartFailed(_) | SchedulerError::StopFailed(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Build the control API router.
pub fn router(ctx: ApiCtx) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/nodes", get(list_nodes).post(register_node))
        .route("/workloads", get(list_workloads).post(submit_workload))
        .route("/workloads/{id}", delete(stop_workload))
        .route("/health/summary", get(health_summary))
        .route("/health/check", post(force_health_check))
        .route("/recovery/metrics", get(recovery_metrics))
        .with_state(ctx)
}

async fn health(State(ctx): State<ApiCtx>) -> Json<HealthResponse> {
    let (nodes, workloads) = ctx.scheduler.counts();
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: ctx.scheduler.now(),
        nodes,
        workloads,
    })
}

async fn list_nodes(State(ctx): State<ApiCtx>) -> Json<Vec<NodeRecord>> {
    Json(ctx.scheduler.list_nodes())
}

async fn register_node(
    State(ctx): State<ApiCtx>,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    let host = body
        .get("host")
        .and_then(Value::as_str)
        .ok_or(ApiError::MissingField("host or port"))?;
    let port = body
        .get("port")
        .and_then(Value::as_u64)
        .and_then(|p| u16::try_from(p).ok())
        .ok_or(ApiError::MissingField("host or port"))?;

    let key = ctx.scheduler.register_node(host, port);
    Ok(Json(MessageResponse {
        message: format!("Node {key} registered"),
    }))
}

async fn list_workloads(State(ctx): State<ApiCtx>) -> Json<Vec<WorkloadRecord>> {
    Json(ctx.scheduler.list_workloads())
}

async fn submit_workload(
    State(ctx): State<ApiCtx>,
    Json(body): Json<Value>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let script_path = body
        .get("script_path")
        .and_then(Value::as_str)
        .ok_or(ApiError::MissingField("script_path"))?;

    let (workload_id, node) = ctx.scheduler.submit(script_path).await?;
    Ok(Json(SubmitResponse {
        workload_id,
        node: node.addr().to_string(),
        status: "started".to_string(),
    }))
}

async fn stop_workload(
    State(ctx): State<ApiCtx>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = WorkloadId::from_string(id);
    ctx.scheduler.stop(&id).await?;
    Ok(Json(MessageResponse {
        message: format!("Workload {id} stopped"),
    }))
}

async fn health_summary(State(ctx): State<ApiCtx>) -> Json<HealthSummary> {
    Json(ctx.scheduler.health_summary())
}

async fn force_health_check(State(ctx): State<ApiCtx>) -> Json<HealthSummary> {
    Json(ctx.scheduler.force_health_check().await)
}

async fn recovery_metrics(State(ctx): State<ApiCtx>) -> Json<RecoveryMetrics> {
    Json(ctx.scheduler.recovery_metrics())
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
