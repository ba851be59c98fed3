//! Workflow activation handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::WorkflowService;
use crate::workflow::Workflow;

/// `{data: Workflow}` envelope.
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub data: Workflow,
}

/// POST /workflows/{id}/activate
pub async fn activate(
    State(service): State<WorkflowService>,
    Path(id): Path<String>,
) -> AppResult<Json<WorkflowResponse>> {
    let data = service.set_active(&id, true).await?;
    Ok(Json(WorkflowResponse { data }))
}

/// POST /workflows/{id}/deactivate
pub async fn deactivate(
    State(service): State<WorkflowService>,
    Path(id): Path<String>,
) -> AppResult<Json<WorkflowResponse>> {
    let data = service.set_active(&id, false).await?;
    Ok(Json(WorkflowResponse { data }))
}
