//! Condition evaluation for workflow runs.
//!
//! Conditions form a conjunction over the runtime context. Evaluation stops
//! at the first condition that does not hold and never errors: malformed
//! input always resolves to a boolean.

use tracing::{debug, warn};

use crate::engine::coerce::{strict_equals, to_display_string, to_float};
use crate::workflow::{Condition, ConditionOperator, Context};

/// Condition evaluator for the workflow gate.
#[derive(Debug, Clone, Default)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Create a new condition evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Check whether every condition holds for the context.
    ///
    /// An empty sequence always passes.
    pub fn check(&self, conditions: &[Condition], context: &Context) -> bool {
        for condition in conditions {
            if !self.evaluate_condition(condition, context) {
                debug!(
                    field = %condition.field,
                    operator = %condition.operator,
                    value = ?condition.value,
                    context_value = ?context.get(&condition.field),
                    "Condition not met"
                );
                return false;
            }
        }

        true
    }

    /// Evaluate a single condition.
    ///
    /// An operator outside the known set is satisfied and logged at warn.
    pub fn evaluate_condition(&self, condition: &Condition, context: &Context) -> bool {
        let context_value = context.get(&condition.field);
        let expected = condition.value.as_ref();

        match &condition.operator {
            ConditionOperator::Equals => strict_equals(context_value, expected),
            ConditionOperator::NotEquals => !strict_equals(context_value, expected),
            ConditionOperator::GreaterThan => {
                to_float(context_value) > to_float(expected)
            }
            ConditionOperator::LessThan => {
                to_float(context_value) < to_float(expected)
            }
            ConditionOperator::Contains => to_display_string(context_value)
                .contains(&to_display_string(expected)),
            ConditionOperator::Exists => matches!(context_value, Some(v) if !v.is_null()),
            ConditionOperator::Other(name) => {
                warn!(operator = %name, field = %condition.field, "Unknown condition operator, treating as satisfied");
                true
            }
        }
    }
}
