//! Workflow activation service.

use std::sync::Arc;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::store::WorkflowSource;
use crate::workflow::Workflow;

/// Workflow lookup and activation toggling.
#[derive(Clone)]
pub struct WorkflowService {
    source: Arc<dyn WorkflowSource>,
}

impl WorkflowService {
    pub fn new(source: Arc<dyn WorkflowSource>) -> Self {
        Self { source }
    }

    /// Set the active flag of a workflow.
    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<Workflow> {
        let workflow = self
            .source
            .set_active(id, active)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workflow not found: {}", id)))?;

        info!(workflow_id = %id, active, "Workflow activation changed");
        Ok(workflow)
    }
}
