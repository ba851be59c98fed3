//! `{{name}}` placeholder substitution.
//!
//! Every `{{ name }}` occurrence is replaced by the string form of
//! `context[name]` (inner text trimmed). Placeholders whose key is absent or
//! null are left verbatim, so rendering never fails.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::engine::coerce::to_display_string;
use crate::workflow::Context;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Placeholder renderer over a runtime context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Substitute context values into `template`.
    pub fn render(&self, template: &str, context: &Context) -> String {
        if !contains_placeholder(template) {
            return template.to_string();
        }

        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                let name = caps[1].trim();
                match context.get(name) {
                    Some(value) if !value.is_null() => to_display_string(Some(value)),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Serialize `value` to JSON text, then substitute placeholders in the text.
    ///
    /// The output is sent as-is; substituted values are not JSON-escaped.
    pub fn render_json(
        &self,
        value: &serde_json::Value,
        context: &Context,
    ) -> Result<String, serde_json::Error> {
        let text = serde_json::to_string(value)?;
        Ok(self.render(&text, context))
    }

    /// Names of placeholders in `template` that the context cannot fill.
    pub fn unresolved(&self, template: &str, context: &Context) -> Vec<String> {
        PLACEHOLDER
            .captures_iter(template)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| context.get(name).map_or(true, |v| v.is_null()))
            .collect()
    }
}

/// Check whether a string contains placeholder syntax.
pub fn contains_placeholder(s: &str) -> bool {
    s.contains("{{")
}
