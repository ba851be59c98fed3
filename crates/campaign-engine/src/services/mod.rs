//! Service layer for the campaign engine.
//!
//! Services encapsulate business logic and coordinate between handlers,
//! the engine, and storage.

pub mod execution;
pub mod workflow;

pub use execution::{ExecutionResponse, ExecutionService};
pub use workflow::WorkflowService;
