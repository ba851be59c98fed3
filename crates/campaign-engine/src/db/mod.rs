//! Database module for the campaign engine.
//!
//! PostgreSQL connectivity, row models, and queries using SQLx.

pub mod models;
pub mod pool;
pub mod queries;
pub mod schema;

pub use pool::{create_pool, health_check, DbPool};
pub use schema::ensure_schema;
