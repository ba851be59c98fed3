//! Workflow execution.
//!
//! Runs one workflow against one context:
//! - Checks the condition gate
//! - Dispatches every action in declared order
//! - Aggregates the outcome into an `ExecutionRecord`

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use tracing::{error, info};

use crate::workflow::{
    generate_execution_id, ActionResult, Context, ExecutionRecord, Workflow, CONDITIONS_NOT_MET,
};

use super::dispatcher::{ActionDispatch, ActionDispatcher};
use super::evaluator::ConditionEvaluator;

/// Executes workflows against a runtime context.
#[derive(Clone)]
pub struct WorkflowExecutor {
    evaluator: ConditionEvaluator,
    dispatcher: Arc<dyn ActionDispatch>,
}

impl Default for WorkflowExecutor {
    fn default() -> Self {
        Self::new(Arc::new(ActionDispatcher::default()))
    }
}

impl WorkflowExecutor {
    /// Create an executor over the given dispatcher.
    pub fn new(dispatcher: Arc<dyn ActionDispatch>) -> Self {
        Self {
            evaluator: ConditionEvaluator::new(),
            dispatcher,
        }
    }

    /// Run a workflow.
    ///
    /// Never fails: a rejected gate, failed actions and orchestration faults
    /// are all reported through the returned record.
    pub async fn run(&self, workflow: &Workflow, context: &Context) -> ExecutionRecord {
        let executed_at = Utc::now();
        let execution_id = generate_execution_id(executed_at);

        info!(
            execution_id = %execution_id,
            workflow_id = %workflow.id,
            actions = workflow.actions.len(),
            "Running workflow"
        );

        let mut record = ExecutionRecord {
            execution_id,
            workflow_id: workflow.id.clone(),
            executed_at,
            success: false,
            reason: None,
            error: None,
            results: Vec::new(),
            context: context.clone(),
        };

        if !workflow.conditions.is_empty() && !self.evaluator.check(&workflow.conditions, context) {
            info!(execution_id = %record.execution_id, "Workflow conditions not met");
            record.reason = Some(CONDITIONS_NOT_MET.to_string());
            return record;
        }

        let mut results = Vec::with_capacity(workflow.actions.len());
        let outcome = AssertUnwindSafe(self.dispatch_all(workflow, context, &mut results))
            .catch_unwind()
            .await;

        record.results = results;
        match outcome {
            Ok(()) => {
                record.success = true;
                info!(
                    execution_id = %record.execution_id,
                    executed = record.actions_executed(),
                    failed = record.actions_failed(),
                    "Workflow completed"
                );
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(
                    execution_id = %record.execution_id,
                    error = %message,
                    completed = record.results.len(),
                    "Workflow execution aborted"
                );
                record.error = Some(message);
            }
        }

        record
    }

    async fn dispatch_all(
        &self,
        workflow: &Workflow,
        context: &Context,
        results: &mut Vec<ActionResult>,
    ) {
        for action in &workflow.actions {
            let result = self
                .dispatcher
                .execute(action, context, &workflow.integrations)
                .await;
            results.push(result);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Workflow execution failed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Action, Integrations};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingDispatcher {
        calls: AtomicUsize,
        panic_on: Option<usize>,
    }

    #[async_trait]
    impl ActionDispatch for CountingDispatcher {
        async fn execute(
            &self,
            action: &Action,
            _context: &Context,
            _integrations: &Integrations,
        ) -> ActionResult {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panic_on == Some(call) {
                panic!("dispatcher exploded");
            }
            ActionResult::succeeded(action.action_type(), json!({"call": call}))
        }
    }

    fn workflow(value: serde_json::Value) -> Workflow {
        serde_json::from_value(value).unwrap()
    }

    fn ctx(value: serde_json::Value) -> Context {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_failed_conditions_dispatch_nothing() {
        let stub = Arc::new(CountingDispatcher::default());
        let executor = WorkflowExecutor::new(stub.clone());
        let wf = workflow(json!({
            "id": 1,
            "name": "NL only",
            "triggers": [],
            "conditions": [{"field": "country", "operator": "equals", "value": "NL"}],
            "actions": [{"type": "send_email"}, {"type": "create_lead"}]
        }));

        let record = executor.run(&wf, &ctx(json!({"country": "DE"}))).await;

        assert!(!record.success);
        assert_eq!(record.reason.as_deref(), Some(CONDITIONS_NOT_MET));
        assert!(record.results.is_empty());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_conditions_dispatch_every_action_in_order() {
        let stub = Arc::new(CountingDispatcher::default());
        let executor = WorkflowExecutor::new(stub.clone());
        let wf = workflow(json!({
            "id": "wf",
            "name": "All",
            "triggers": [],
            "actions": [
                {"type": "delay"},
                {"type": "send_email"},
                {"type": "api_call"},
                {"type": "create_lead"}
            ]
        }));

        let record = executor.run(&wf, &Context::new()).await;

        assert!(record.success);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 4);
        let kinds: Vec<&str> = record.results.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(kinds, vec!["delay", "send_email", "api_call", "create_lead"]);
        for (i, result) in record.results.iter().enumerate() {
            assert_eq!(result.result, Some(json!({"call": i})));
        }
    }

    #[tokio::test]
    async fn test_mixed_outcomes_still_succeed() {
        // Aggregate success means "ran to completion", not "all actions passed".
        let executor = WorkflowExecutor::default();
        let wf = workflow(json!({
            "id": "mixed",
            "name": "Mixed",
            "triggers": [],
            "actions": [
                {"type": "delay", "duration": 60},
                {"type": "unknown_type"},
                {"type": "send_email", "recipient": "ada@example.com"}
            ]
        }));

        let record = executor.run(&wf, &Context::new()).await;

        assert!(record.success);
        assert!(record.error.is_none());
        assert_eq!(record.results.len(), 3);
        assert!(record.results[0].success);
        assert!(!record.results[1].success);
        assert_eq!(
            record.results[1].error.as_deref(),
            Some("Unknown action type: unknown_type")
        );
        assert!(record.results[2].success);
        assert_eq!(record.actions_failed(), 1);
    }

    #[tokio::test]
    async fn test_panic_yields_failed_record_with_partial_results() {
        let stub = Arc::new(CountingDispatcher {
            calls: AtomicUsize::new(0),
            panic_on: Some(1),
        });
        let executor = WorkflowExecutor::new(stub.clone());
        let wf = workflow(json!({
            "id": "boom",
            "name": "Boom",
            "triggers": [],
            "actions": [{"type": "delay"}, {"type": "delay"}, {"type": "delay"}]
        }));

        let record = executor.run(&wf, &Context::new()).await;

        assert!(!record.success);
        assert_eq!(record.error.as_deref(), Some("dispatcher exploded"));
        assert_eq!(record.results.len(), 1);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_record_carries_context_and_fresh_ids() {
        let executor = WorkflowExecutor::default();
        let wf = workflow(json!({"id": 3, "name": "Ids", "triggers": [], "actions": []}));
        let context = ctx(json!({"email": "ada@example.com"}));

        let mut ids = HashSet::new();
        for _ in 0..20 {
            let record = executor.run(&wf, &context).await;
            assert!(record.success);
            assert_eq!(record.workflow_id, "3");
            assert_eq!(record.context, context);
            ids.insert(record.execution_id);
        }
        assert_eq!(ids.len(), 20);
    }
}
