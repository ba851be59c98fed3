//! Execution history handler.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::services::ExecutionService;
use crate::workflow::ExecutionRecord;

/// List execution records of a workflow, newest first.
///
/// GET /workflows/{id}/executions?page=&pageSize=
pub async fn list(
    State(service): State<ExecutionService>,
    Path(id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<ExecutionRecord>>> {
    let response = service.history(&id, &params).await?;
    Ok(Json(response))
}
