//! Database row models.

pub mod execution;
pub mod workflow;

pub use execution::ExecutionRow;
pub use workflow::WorkflowRow;
