//! Execution record row model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppResult;
use crate::workflow::ExecutionRecord;

/// Row of `workflow_executions`.
#[derive(Debug, Clone, FromRow)]
pub struct ExecutionRow {
    pub execution_id: String,
    pub workflow_id: String,
    pub executed_at: DateTime<Utc>,
    pub success: bool,
    pub reason: Option<String>,
    pub error: Option<String>,
    /// Serialized `Vec<ActionResult>`
    pub results: serde_json::Value,
    /// Serialized context map
    pub context: serde_json::Value,
}

impl ExecutionRow {
    /// Decode the JSONB columns back into an execution record.
    pub fn into_record(self) -> AppResult<ExecutionRecord> {
        Ok(ExecutionRecord {
            execution_id: self.execution_id,
            workflow_id: self.workflow_id,
            executed_at: self.executed_at,
            success: self.success,
            reason: self.reason,
            error: self.error,
            results: serde_json::from_value(self.results)?,
            context: serde_json::from_value(self.context)?,
        })
    }
}
