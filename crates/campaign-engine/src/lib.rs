//! Campaign Workflow Engine
//!
//! Runs stored campaign workflows against a runtime context:
//!
//! - **Condition gate**: All conditions must hold before anything runs
//! - **Actions**: Email, lead, delay, and templated outbound API calls,
//!   executed strictly in declared order
//! - **Execution history**: Every run is appended as an auditable record
//!
//! ## Modules
//!
//! - [`workflow`]: Definition model, decoding, and execution records
//! - [`engine`]: Condition evaluator, action dispatcher, and executor
//! - [`template`]: `{{name}}` placeholder substitution
//! - [`store`]: Execution history and workflow source backends
//! - [`services`]: Request-level orchestration
//! - [`handlers`] / [`router`]: HTTP surface
//! - [`config`]: Configuration loading from environment variables
//! - [`error`]: Custom error types with Axum integration
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use campaign_engine::{
//!     config::AppConfig,
//!     engine::WorkflowExecutor,
//!     router::build_router,
//!     state::AppState,
//!     store::{MemoryExecutionStore, MemoryWorkflowSource},
//! };
//!
//! let state = AppState::new(
//!     AppConfig::default(),
//!     Arc::new(MemoryWorkflowSource::from_file("workflows.yaml")?),
//!     Arc::new(MemoryExecutionStore::new()),
//!     WorkflowExecutor::default(),
//! );
//! let app = build_router(state);
//! ```

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod result_ext;
pub mod router;
pub mod services;
pub mod state;
pub mod store;
pub mod template;
pub mod workflow;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
