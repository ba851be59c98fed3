//! Workflow execution service.
//!
//! Resolves a workflow, runs it, and appends the outcome to the execution
//! history. A storage failure never hides the outcome: it is returned with
//! the error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::WorkflowExecutor;
use crate::error::{AppError, AppResult};
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::result_ext::ResultExt;
use crate::store::{ExecutionStore, WorkflowSource};
use crate::workflow::{validate_workflow, ActionResult, Context, ExecutionRecord};

/// Response body of `POST /workflows/{id}/execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub success: bool,
    pub execution_id: String,
    pub results: Vec<ActionResult>,
    pub actions_executed: usize,
    pub executed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&ExecutionRecord> for ExecutionResponse {
    fn from(record: &ExecutionRecord) -> Self {
        Self {
            success: record.success,
            execution_id: record.execution_id.clone(),
            results: record.results.clone(),
            actions_executed: record.actions_executed(),
            executed_at: record.executed_at,
            reason: record.reason.clone(),
            error: record.error.clone(),
        }
    }
}

/// Execution service.
#[derive(Clone)]
pub struct ExecutionService {
    source: Arc<dyn WorkflowSource>,
    store: Arc<dyn ExecutionStore>,
    executor: WorkflowExecutor,
}

impl ExecutionService {
    /// Create a new execution service.
    pub fn new(
        source: Arc<dyn WorkflowSource>,
        store: Arc<dyn ExecutionStore>,
        executor: WorkflowExecutor,
    ) -> Self {
        Self {
            source,
            store,
            executor,
        }
    }

    /// Run a workflow and record the outcome.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no workflow has this id
    /// - `BadRequest` when the workflow is inactive
    /// - `Validation` when the stored definition is invalid
    /// - `NotPersisted` when the run finished but its record was not stored
    pub async fn execute(&self, workflow_id: &str, context: Context) -> AppResult<ExecutionResponse> {
        let workflow = self
            .source
            .find(workflow_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workflow not found: {}", workflow_id)))?;

        if !workflow.is_active {
            return Err(AppError::BadRequest("Workflow is not active".to_string()));
        }

        validate_workflow(&workflow)?;

        let record = self.executor.run(&workflow, &context).await;
        let response = ExecutionResponse::from(&record);

        if let Err(e) = self
            .store
            .append(&record)
            .await
            .log("execution record not persisted")
        {
            return Err(AppError::NotPersisted {
                message: e.to_string(),
                outcome: Box::new(serde_json::to_value(&response)?),
            });
        }

        info!(
            execution_id = %record.execution_id,
            workflow_id = %workflow_id,
            success = record.success,
            "Execution recorded"
        );

        Ok(response)
    }

    /// Page through the execution history of a workflow, newest first.
    pub async fn history(
        &self,
        workflow_id: &str,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<ExecutionRecord>> {
        let page = self.store.list(workflow_id, params).await?;
        Ok(PaginatedResponse::new(page.records, params, page.total))
    }
}
