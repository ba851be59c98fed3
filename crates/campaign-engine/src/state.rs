//! Application state for the campaign engine server.
//!
//! Built once at startup and handed to the router. It owns every
//! collaborator a request needs, so nothing is registered globally.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::engine::WorkflowExecutor;
use crate::services::{ExecutionService, WorkflowService};
use crate::store::{ExecutionStore, WorkflowSource};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Execution history, used directly by health checks
    pub store: Arc<dyn ExecutionStore>,

    pub executions: ExecutionService,

    pub workflows: WorkflowService,

    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Wire the services over the given storage backends.
    pub fn new(
        config: AppConfig,
        source: Arc<dyn WorkflowSource>,
        store: Arc<dyn ExecutionStore>,
        executor: WorkflowExecutor,
    ) -> Self {
        Self {
            config: Arc::new(config),
            executions: ExecutionService::new(source.clone(), store.clone(), executor),
            workflows: WorkflowService::new(source),
            store,
            start_time: Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryExecutionStore, MemoryWorkflowSource};

    #[test]
    fn test_uptime_starts_at_zero() {
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(MemoryWorkflowSource::new()),
            Arc::new(MemoryExecutionStore::new()),
            WorkflowExecutor::default(),
        );
        assert_eq!(state.uptime_seconds(), 0);
    }
}
