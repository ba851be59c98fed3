//! Campaign workflow definition types.
//!
//! A workflow is read from the content store as JSON (or YAML when seeded
//! from a file) and is never modified while it runs:
//! - `triggers` are carried along but never evaluated by the engine
//! - `conditions` gate the run (all must hold)
//! - `actions` run in declared order
//! - `apiIntegrations` holds named configuration for `api_call` actions

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Runtime input supplied per invocation.
pub type Context = HashMap<String, serde_json::Value>;

/// Integration name to its free-form configuration.
pub type Integrations = HashMap<String, serde_json::Value>;

// ============================================================================
// Workflow
// ============================================================================

/// A named, condition-gated, ordered list of actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Content store identifier. Numeric ids are accepted and kept as text.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub name: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    pub triggers: Vec<Trigger>,

    #[serde(default)]
    pub conditions: Vec<Condition>,

    pub actions: Vec<Action>,

    #[serde(default, rename = "apiIntegrations", alias = "integrations")]
    pub integrations: Integrations,
}

fn default_true() -> bool {
    true
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// External event description. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trigger(pub serde_json::Value);

// ============================================================================
// Conditions
// ============================================================================

/// A single boolean test against a context field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub field: String,

    pub operator: ConditionOperator,

    /// Absent stays `None` and compares like an undefined context field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Condition {
    pub fn new(field: &str, operator: ConditionOperator, value: serde_json::Value) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: Some(value),
        }
    }
}

/// Comparison operator of a condition.
///
/// Operator names outside the known set are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    Exists,
    Other(String),
}

impl From<String> for ConditionOperator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "equals" => ConditionOperator::Equals,
            "not_equals" => ConditionOperator::NotEquals,
            "greater_than" => ConditionOperator::GreaterThan,
            "less_than" => ConditionOperator::LessThan,
            "contains" => ConditionOperator::Contains,
            "exists" => ConditionOperator::Exists,
            _ => ConditionOperator::Other(s),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        op.to_string()
    }
}

impl std::fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::GreaterThan => "greater_than",
            ConditionOperator::LessThan => "less_than",
            ConditionOperator::Contains => "contains",
            ConditionOperator::Exists => "exists",
            ConditionOperator::Other(s) => s,
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// One unit of work attempted during a run, tagged by `type`.
///
/// Any `type` outside the known set (or a missing one) decodes to
/// `Unknown` instead of failing the whole definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SendEmail(SendEmailAction),
    CreateLead(CreateLeadAction),
    ApiCall(ApiCallAction),
    Delay(DelayAction),
    Unknown(UnknownAction),
}

impl Action {
    /// The `type` string this action was declared with.
    pub fn action_type(&self) -> &str {
        match self {
            Action::SendEmail(_) => "send_email",
            Action::CreateLead(_) => "create_lead",
            Action::ApiCall(_) => "api_call",
            Action::Delay(_) => "delay",
            Action::Unknown(u) => &u.kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendEmailAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateLeadAction {
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DelayAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Outbound HTTP request with `{{name}}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiCallAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// HTTP method (default: GET).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub headers: serde_json::Map<String, serde_json::Value>,

    /// Serialized to JSON text before placeholder substitution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    /// Name of an entry in the workflow's `apiIntegrations`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An action whose `type` the engine does not know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnknownAction {
    /// Declared type; empty when the action had none.
    pub kind: String,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let kind = match fields.remove("type") {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let body = serde_json::Value::Object(fields);

        let action = match kind.as_str() {
            "send_email" => Action::SendEmail(serde_json::from_value(body).map_err(D::Error::custom)?),
            "create_lead" => {
                Action::CreateLead(serde_json::from_value(body).map_err(D::Error::custom)?)
            }
            "api_call" => Action::ApiCall(serde_json::from_value(body).map_err(D::Error::custom)?),
            "delay" => Action::Delay(serde_json::from_value(body).map_err(D::Error::custom)?),
            _ => {
                let fields = match body {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                Action::Unknown(UnknownAction { kind, fields })
            }
        };

        Ok(action)
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::Error as _;

        let value = match self {
            Action::SendEmail(a) => serde_json::to_value(a),
            Action::CreateLead(a) => serde_json::to_value(a),
            Action::ApiCall(a) => serde_json::to_value(a),
            Action::Delay(a) => serde_json::to_value(a),
            Action::Unknown(u) => Ok(serde_json::Value::Object(u.fields.clone())),
        }
        .map_err(S::Error::custom)?;

        let mut map = match value {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        if !(matches!(self, Action::Unknown(u) if u.kind.is_empty())) {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(self.action_type().to_string()),
            );
        }

        map.serialize(serializer)
    }
}
