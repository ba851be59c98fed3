//! Schema bootstrap.
//!
//! Creates the campaign tables on startup when they are missing. Statements
//! are idempotent so every replica may run them.

use crate::db::DbPool;
use crate::error::AppResult;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS workflow_executions (
        id BIGSERIAL PRIMARY KEY,
        execution_id TEXT NOT NULL UNIQUE,
        workflow_id TEXT NOT NULL,
        executed_at TIMESTAMPTZ NOT NULL,
        success BOOLEAN NOT NULL,
        reason TEXT,
        error TEXT,
        results JSONB NOT NULL DEFAULT '[]'::jsonb,
        context JSONB NOT NULL DEFAULT '{}'::jsonb
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_workflow_executions_workflow_executed_at
        ON workflow_executions (workflow_id, executed_at DESC)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS campaign_workflows (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        triggers JSONB NOT NULL DEFAULT '[]'::jsonb,
        conditions JSONB NOT NULL DEFAULT '[]'::jsonb,
        actions JSONB NOT NULL DEFAULT '[]'::jsonb,
        api_integrations JSONB NOT NULL DEFAULT '{}'::jsonb,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Create the campaign tables and indexes if they do not exist.
pub async fn ensure_schema(pool: &DbPool) -> AppResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}
