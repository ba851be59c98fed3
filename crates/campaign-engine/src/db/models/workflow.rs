//! Workflow definition row model.

use serde_json::json;
use sqlx::FromRow;

use crate::error::AppResult;
use crate::workflow::{workflow_from_value, Workflow};

/// Row of `campaign_workflows`.
///
/// The JSONB columns hold the definition as authored; they are decoded and
/// validated on read.
#[derive(Debug, Clone, FromRow)]
pub struct WorkflowRow {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub triggers: serde_json::Value,
    pub conditions: serde_json::Value,
    pub actions: serde_json::Value,
    pub api_integrations: serde_json::Value,
}

impl WorkflowRow {
    /// Decode and validate the stored definition.
    pub fn into_workflow(self) -> AppResult<Workflow> {
        workflow_from_value(json!({
            "id": self.id,
            "name": self.name,
            "isActive": self.is_active,
            "triggers": self.triggers,
            "conditions": self.conditions,
            "actions": self.actions,
            "apiIntegrations": self.api_integrations,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn row(actions: serde_json::Value) -> WorkflowRow {
        WorkflowRow {
            id: "welcome".to_string(),
            name: "Welcome".to_string(),
            is_active: false,
            triggers: json!([{"event": "signup"}]),
            conditions: json!([]),
            actions,
            api_integrations: json!({}),
        }
    }

    #[test]
    fn test_into_workflow() {
        let workflow = row(json!([{"type": "send_email"}])).into_workflow().unwrap();
        assert_eq!(workflow.id, "welcome");
        assert!(!workflow.is_active);
        assert_eq!(workflow.actions.len(), 1);
    }

    #[test]
    fn test_non_array_actions_rejected() {
        let err = row(json!({"type": "send_email"})).into_workflow().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
