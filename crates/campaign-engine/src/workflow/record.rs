//! Execution outcome types.
//!
//! One `ActionResult` per attempted action and one `ExecutionRecord` per run.
//! Records are immutable once built and are appended to the execution store
//! as audit entries.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::Context;

/// Reason recorded when the condition gate rejects a run.
pub const CONDITIONS_NOT_MET: &str = "Workflow conditions not met";

const EXECUTION_ID_SUFFIX_LEN: usize = 8;

/// Outcome of a single action attempt.
///
/// Exactly one of `result` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// The action's declared `type`.
    pub action: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub executed_at: DateTime<Utc>,
}

impl ActionResult {
    /// Create a successful result.
    pub fn succeeded(action: &str, result: serde_json::Value) -> Self {
        Self {
            action: action.to_string(),
            success: true,
            result: Some(result),
            error: None,
            executed_at: Utc::now(),
        }
    }

    /// Create a failed result.
    pub fn failed(action: &str, error: impl Into<String>) -> Self {
        Self {
            action: action.to_string(),
            success: false,
            result: None,
            error: Some(error.into()),
            executed_at: Utc::now(),
        }
    }
}

/// Audit entry for one `run` call.
///
/// `success` means the run completed without an orchestration fault. It does
/// not mean every action succeeded; inspect `results[i].success` for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub execution_id: String,
    pub workflow_id: String,
    pub executed_at: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<ActionResult>,
    #[serde(default)]
    pub context: Context,
}

impl ExecutionRecord {
    /// Number of actions that were attempted.
    pub fn actions_executed(&self) -> usize {
        self.results.len()
    }

    /// Number of attempted actions that failed.
    pub fn actions_failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

/// Generate a run identifier: `exec_<unix micros>_<random suffix>`.
///
/// The timestamp orders ids roughly by start time; the random suffix keeps
/// concurrent runs within the same microsecond apart.
pub fn generate_execution_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(EXECUTION_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("exec_{}_{}", now.timestamp_micros(), suffix)
}
