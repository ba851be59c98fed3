//! In-memory storage backend.
//!
//! Used for local runs and tests. State lives for the lifetime of the
//! process.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::pagination::PaginationParams;
use crate::workflow::{parse_workflows, ExecutionRecord, Workflow};

use super::{ExecutionPage, ExecutionStore, WorkflowSource};

/// Execution history held in a vector, append order preserved.
#[derive(Debug, Default)]
pub struct MemoryExecutionStore {
    records: RwLock<Vec<ExecutionRecord>>,
}

impl MemoryExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all workflows.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ExecutionStore for MemoryExecutionStore {
    async fn append(&self, record: &ExecutionRecord) -> AppResult<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list(&self, workflow_id: &str, page: &PaginationParams) -> AppResult<ExecutionPage> {
        let records = self.records.read().await;

        // Newest append first, so ties on executed_at keep the later record on top.
        let mut matching: Vec<&ExecutionRecord> = records
            .iter()
            .rev()
            .filter(|r| r.workflow_id == workflow_id)
            .collect();
        matching.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));

        let total = matching.len() as i64;
        let records = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(ExecutionPage { records, total })
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Workflow definitions keyed by id.
#[derive(Debug, Default)]
pub struct MemoryWorkflowSource {
    workflows: RwLock<HashMap<String, Workflow>>,
}

impl MemoryWorkflowSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workflows(workflows: impl IntoIterator<Item = Workflow>) -> Self {
        let workflows = workflows
            .into_iter()
            .map(|wf| (wf.id.clone(), wf))
            .collect();
        Self {
            workflows: RwLock::new(workflows),
        }
    }

    /// Seed from a YAML or JSON file of workflow definitions.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to read workflows file {}: {}",
                path.display(),
                e
            ))
        })?;

        let workflows = parse_workflows(&content)?;
        tracing::info!(
            path = %path.display(),
            count = workflows.len(),
            "Loaded workflow definitions"
        );

        Ok(Self::with_workflows(workflows))
    }
}

#[async_trait]
impl WorkflowSource for MemoryWorkflowSource {
    async fn find(&self, id: &str) -> AppResult<Option<Workflow>> {
        Ok(self.workflows.read().await.get(id).cloned())
    }

    async fn set_active(&self, id: &str, active: bool) -> AppResult<Option<Workflow>> {
        let mut workflows = self.workflows.write().await;
        Ok(workflows.get_mut(id).map(|wf| {
            wf.is_active = active;
            wf.clone()
        }))
    }

    async fn save(&self, workflow: &Workflow) -> AppResult<()> {
        self.workflows
            .write()
            .await
            .insert(workflow.id.clone(), workflow.clone());
        Ok(())
    }
}
