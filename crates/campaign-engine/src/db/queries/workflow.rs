//! Workflow definition queries.

use crate::db::models::WorkflowRow;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::workflow::Workflow;

/// Get a workflow definition by id.
pub async fn get_workflow(pool: &DbPool, id: &str) -> AppResult<Option<WorkflowRow>> {
    let row = sqlx::query_as::<_, WorkflowRow>(
        r#"
        SELECT id, name, is_active, triggers, conditions, actions, api_integrations
        FROM campaign_workflows
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Set the active flag of a workflow, returning the updated row.
pub async fn set_workflow_active(
    pool: &DbPool,
    id: &str,
    active: bool,
) -> AppResult<Option<WorkflowRow>> {
    let row = sqlx::query_as::<_, WorkflowRow>(
        r#"
        UPDATE campaign_workflows
        SET is_active = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, is_active, triggers, conditions, actions, api_integrations
        "#,
    )
    .bind(id)
    .bind(active)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert or replace a workflow definition.
pub async fn upsert_workflow(pool: &DbPool, workflow: &Workflow) -> AppResult<()> {
    let triggers = serde_json::to_value(&workflow.triggers)?;
    let conditions = serde_json::to_value(&workflow.conditions)?;
    let actions = serde_json::to_value(&workflow.actions)?;
    let integrations = serde_json::to_value(&workflow.integrations)?;

    sqlx::query(
        r#"
        INSERT INTO campaign_workflows
            (id, name, is_active, triggers, conditions, actions, api_integrations)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            is_active = EXCLUDED.is_active,
            triggers = EXCLUDED.triggers,
            conditions = EXCLUDED.conditions,
            actions = EXCLUDED.actions,
            api_integrations = EXCLUDED.api_integrations,
            updated_at = NOW()
        "#,
    )
    .bind(&workflow.id)
    .bind(&workflow.name)
    .bind(workflow.is_active)
    .bind(triggers)
    .bind(conditions)
    .bind(actions)
    .bind(integrations)
    .execute(pool)
    .await?;

    Ok(())
}
