//! HTTP handlers for the campaign engine API.

pub mod execute;
pub mod executions;
pub mod health;
pub mod workflows;

pub use execute::execute;
pub use health::{api_health, health_check};
