//! Execution record queries.

use crate::db::models::ExecutionRow;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::workflow::ExecutionRecord;

/// Insert an execution record.
pub async fn insert_execution(pool: &DbPool, record: &ExecutionRecord) -> AppResult<()> {
    let results = serde_json::to_value(&record.results)?;
    let context = serde_json::to_value(&record.context)?;

    sqlx::query(
        r#"
        INSERT INTO workflow_executions
            (execution_id, workflow_id, executed_at, success, reason, error, results, context)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(&record.execution_id)
    .bind(&record.workflow_id)
    .bind(record.executed_at)
    .bind(record.success)
    .bind(&record.reason)
    .bind(&record.error)
    .bind(results)
    .bind(context)
    .execute(pool)
    .await?;

    Ok(())
}

/// List a page of execution records for a workflow, newest first.
pub async fn list_executions(
    pool: &DbPool,
    workflow_id: &str,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<ExecutionRow>> {
    let rows = sqlx::query_as::<_, ExecutionRow>(
        r#"
        SELECT execution_id, workflow_id, executed_at, success, reason, error, results, context
        FROM workflow_executions
        WHERE workflow_id = $1
        ORDER BY executed_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(workflow_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count all execution records for a workflow.
pub async fn count_executions(pool: &DbPool, workflow_id: &str) -> AppResult<i64> {
    let result: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM workflow_executions
        WHERE workflow_id = $1
        "#,
    )
    .bind(workflow_id)
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}
