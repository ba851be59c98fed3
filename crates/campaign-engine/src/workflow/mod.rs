//! Campaign workflow model.
//!
//! - Definition types (workflow, conditions, actions)
//! - Execution outcome types
//! - Decoding and validation

pub mod parser;
pub mod record;
pub mod types;

pub use parser::{parse_workflows, validate_workflow, workflow_from_value};
pub use record::{generate_execution_id, ActionResult, ExecutionRecord, CONDITIONS_NOT_MET};
pub use types::{
    Action, ApiCallAction, Condition, ConditionOperator, Context, CreateLeadAction, DelayAction,
    Integrations, SendEmailAction, Trigger, UnknownAction, Workflow,
};
