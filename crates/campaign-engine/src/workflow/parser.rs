//! Workflow definition decoding and validation.
//!
//! Definitions arrive as JSON from the content store or as YAML/JSON seed
//! files. Both paths end in `validate_workflow` so malformed definitions are
//! rejected before they reach the executor.

use crate::error::{AppError, AppResult};
use crate::workflow::types::Workflow;

/// Decode a workflow from a JSON value and validate it.
pub fn workflow_from_value(value: serde_json::Value) -> AppResult<Workflow> {
    let workflow: Workflow = serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Invalid workflow definition: {}", e)))?;

    validate_workflow(&workflow)?;

    Ok(workflow)
}

/// Parse a YAML (or JSON) document holding a list of workflows.
///
/// Accepts either a top-level sequence or a mapping with a `workflows` key.
pub fn parse_workflows(content: &str) -> AppResult<Vec<Workflow>> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;

    let items = match value {
        serde_yaml::Value::Sequence(items) => items,
        serde_yaml::Value::Mapping(ref map) => match map.get("workflows") {
            Some(serde_yaml::Value::Sequence(items)) => items.clone(),
            _ => {
                return Err(AppError::Parse(
                    "Expected a list of workflows or a 'workflows' key".to_string(),
                ))
            }
        },
        _ => {
            return Err(AppError::Parse(
                "Expected a list of workflows or a 'workflows' key".to_string(),
            ))
        }
    };

    let mut workflows = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let workflow: Workflow = serde_yaml::from_value(item).map_err(|e| {
            AppError::Validation(format!("workflows[{}]: invalid definition: {}", idx, e))
        })?;
        validate_workflow(&workflow)?;
        workflows.push(workflow);
    }

    Ok(workflows)
}

/// Validate a decoded workflow.
///
/// Array-ness of triggers, conditions and actions is enforced by decoding;
/// this checks what the types cannot express.
pub fn validate_workflow(workflow: &Workflow) -> AppResult<()> {
    if workflow.id.trim().is_empty() {
        return Err(AppError::Validation("Workflow id is required".to_string()));
    }

    if workflow.name.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Workflow '{}': name is required",
            workflow.id
        )));
    }

    Ok(())
}
