//! Storage seams.
//!
//! - [`ExecutionStore`]: append-only execution history
//! - [`WorkflowSource`]: workflow lookup and activation
//!
//! Two backends implement both: PostgreSQL and in-memory.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::pagination::PaginationParams;
use crate::workflow::{ExecutionRecord, Workflow};

pub use memory::{MemoryExecutionStore, MemoryWorkflowSource};
pub use postgres::PostgresStore;

/// One page of execution records plus the unpaged total.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPage {
    pub records: Vec<ExecutionRecord>,
    pub total: i64,
}

/// Append-only store of execution records.
///
/// Safe for concurrent writers; reads see records ordered by `executed_at`
/// descending.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Append a record. Records are never updated.
    async fn append(&self, record: &ExecutionRecord) -> AppResult<()>;

    /// List a page of records for one workflow, newest first.
    async fn list(&self, workflow_id: &str, page: &PaginationParams) -> AppResult<ExecutionPage>;

    /// Check whether the backing storage is reachable.
    async fn health_check(&self) -> bool;
}

/// Read side of the workflow content store.
#[async_trait]
pub trait WorkflowSource: Send + Sync {
    /// Look up a workflow by id.
    async fn find(&self, id: &str) -> AppResult<Option<Workflow>>;

    /// Toggle the active flag, returning the updated workflow.
    async fn set_active(&self, id: &str, active: bool) -> AppResult<Option<Workflow>>;

    /// Insert or replace a workflow definition.
    async fn save(&self, workflow: &Workflow) -> AppResult<()>;
}
