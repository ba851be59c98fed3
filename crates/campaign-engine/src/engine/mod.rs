//! Workflow execution engine.
//!
//! - **Evaluator**: Checks the condition gate
//! - **Dispatcher**: Executes a single action
//! - **Executor**: Runs a whole workflow and builds the execution record

pub mod coerce;
pub mod dispatcher;
pub mod evaluator;
pub mod executor;

pub use dispatcher::{ActionDispatch, ActionDispatcher, DispatchError, DEFAULT_HTTP_TIMEOUT};
pub use evaluator::ConditionEvaluator;
pub use executor::WorkflowExecutor;
