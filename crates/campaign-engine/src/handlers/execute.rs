//! Workflow execution handler.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::{ExecutionResponse, ExecutionService};
use crate::workflow::Context;

/// Request to run a workflow. The whole body is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Runtime context supplied to conditions and templates.
    #[serde(default)]
    pub context: Context,
}

impl ExecuteRequest {
    /// Decode a request body; an empty body means an empty context.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
    }
}

/// Run a workflow.
///
/// POST /workflows/{id}/execute
pub async fn execute(
    State(service): State<ExecutionService>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<ExecutionResponse>> {
    let request = ExecuteRequest::from_body(&body)?;

    debug!(workflow_id = %id, keys = request.context.len(), "Execute request");

    let response = service.execute(&id, request.context).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_context() {
        assert!(ExecuteRequest::from_body(b"").unwrap().context.is_empty());
        assert!(ExecuteRequest::from_body(b"  \n").unwrap().context.is_empty());
        assert!(ExecuteRequest::from_body(b"{}").unwrap().context.is_empty());
    }

    #[test]
    fn test_context_decoded() {
        let request = ExecuteRequest::from_body(br#"{"context": {"age": 30}}"#).unwrap();
        assert_eq!(request.context["age"], 30);
    }

    #[test]
    fn test_non_object_context_rejected() {
        let err = ExecuteRequest::from_body(br#"{"context": [1, 2]}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
