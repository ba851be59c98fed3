//! Template rendering module.
//!
//! Provides `{{name}}` placeholder substitution for `api_call` actions.

pub mod placeholder;

pub use placeholder::{contains_placeholder, TemplateRenderer};
