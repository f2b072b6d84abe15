//! HTTP request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use orchestra_core::{WorkflowDefinition, WorkflowRecord, WorkflowStatus};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_workflows: usize,
    pub running: usize,
    pub uptime_seconds: u64,
    pub timestamp: String,
}

/// Query parameters for listing workflows.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub limit: Option<usize>,
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "AI Orchestra - Orchestration Service",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let orchestrator = &state.orchestrator;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        active_workflows: orchestrator.workflow_count().await?,
        running: orchestrator.running_count().await?,
        uptime_seconds: state.uptime_seconds(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// POST /run-graph
///
/// Accepts the workflow and starts it in the background. The response is
/// the initial Pending record.
pub async fn run_graph(
    State(state): State<Arc<AppState>>,
    body: Result<Json<WorkflowDefinition>, JsonRejection>,
) -> Result<Json<WorkflowRecord>, ApiError> {
    let Json(definition) = body.map_err(|rejection| {
        let message = rejection.body_text();
        if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
            ApiError::Unprocessable(message)
        } else {
            ApiError::BadRequest(message)
        }
    })?;

    let record = state.orchestrator.submit(definition).await?;
    info!(
        workflow_id = %record.workflow_id,
        mode = %record.workflow_type,
        "Accepted workflow"
    );
    Ok(Json(record))
}

/// GET /status/{workflow_id}
pub async fn workflow_status(
    State(state): State<Arc<AppState>>,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowRecord>, ApiError> {
    Ok(Json(state.orchestrator.get_status(&workflow_id).await?))
}

/// GET /workflows?status=&limit=
pub async fn list_workflows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<WorkflowRecord>>, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<WorkflowStatus>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let records = state.orchestrator.list_workflows(status, params.limit).await?;
    Ok(Json(records))
}

/// DELETE /workflows/{workflow_id}
pub async fn delete_workflow(
    State(state): State<Arc<AppState>>,
    Path(workflow_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.orchestrator.delete_workflow(&workflow_id).await?;
    Ok(Json(json!({ "message": format!("Workflow {} deleted", workflow_id) })))
}
