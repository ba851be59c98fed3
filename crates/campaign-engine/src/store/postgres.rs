//! PostgreSQL storage backend.

use async_trait::async_trait;

use crate::db::queries::{execution as execution_queries, workflow as workflow_queries};
use crate::db::{self, DbPool};
use crate::error::AppResult;
use crate::pagination::PaginationParams;
use crate::workflow::{ExecutionRecord, Workflow};

use super::{ExecutionPage, ExecutionStore, WorkflowSource};

/// Both storage seams over a single connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: DbPool,
}

impl PostgresStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExecutionStore for PostgresStore {
    async fn append(&self, record: &ExecutionRecord) -> AppResult<()> {
        execution_queries::insert_execution(&self.pool, record).await
    }

    async fn list(&self, workflow_id: &str, page: &PaginationParams) -> AppResult<ExecutionPage> {
        let rows =
            execution_queries::list_executions(&self.pool, workflow_id, page.limit(), page.offset())
                .await?;
        let total = execution_queries::count_executions(&self.pool, workflow_id).await?;

        let records = rows
            .into_iter()
            .map(|row| row.into_record())
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ExecutionPage { records, total })
    }

    async fn health_check(&self) -> bool {
        db::health_check(&self.pool).await
    }
}

#[async_trait]
impl WorkflowSource for PostgresStore {
    async fn find(&self, id: &str) -> AppResult<Option<Workflow>> {
        workflow_queries::get_workflow(&self.pool, id)
            .await?
            .map(|row| row.into_workflow())
            .transpose()
    }

    async fn set_active(&self, id: &str, active: bool) -> AppResult<Option<Workflow>> {
        workflow_queries::set_workflow_active(&self.pool, id, active)
            .await?
            .map(|row| row.into_workflow())
            .transpose()
    }

    async fn save(&self, workflow: &Workflow) -> AppResult<()> {
        workflow_queries::upsert_workflow(&self.pool, workflow).await
    }
}
