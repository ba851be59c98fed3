//! Action dispatch.
//!
//! Executes one action against the runtime context. Every failure is turned
//! into a failed `ActionResult` here; nothing propagates to the executor.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::coerce::to_display_string;
use crate::template::TemplateRenderer;
use crate::workflow::{
    Action, ActionResult, ApiCallAction, Context, DelayAction, Integrations, SendEmailAction,
};

/// Default timeout for outbound `api_call` requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes a single action.
///
/// Implementations must always return a result, converting failures into
/// `ActionResult::failed`.
#[async_trait]
pub trait ActionDispatch: Send + Sync {
    async fn execute(
        &self,
        action: &Action,
        context: &Context,
        integrations: &Integrations,
    ) -> ActionResult;
}

/// Failures inside a single action.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown action type: {0}")]
    UnknownActionType(String),

    #[error("API call failed: endpoint is required")]
    MissingEndpoint,

    #[error("API call failed: unknown integration '{0}'")]
    UnknownIntegration(String),

    #[error("API call failed: invalid method '{0}'")]
    InvalidMethod(String),

    #[error("API call failed: {0} request cannot have a body")]
    BodyNotAllowed(Method),

    #[error("API call failed: invalid header '{0}'")]
    InvalidHeader(String),

    #[error("API call failed: {0}")]
    Body(#[from] serde_json::Error),

    #[error("API call failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API call failed: invalid JSON response: {0}")]
    InvalidResponse(String),
}

/// Dispatcher for the built-in action types.
#[derive(Clone)]
pub struct ActionDispatcher {
    client: reqwest::Client,
    renderer: TemplateRenderer,
    timeout: Duration,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

impl ActionDispatcher {
    /// Create a dispatcher whose outbound requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self::with_client(client, timeout)
    }

    /// Create a dispatcher with a custom client.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            renderer: TemplateRenderer::new(),
            timeout,
        }
    }

    async fn dispatch(
        &self,
        action: &Action,
        context: &Context,
        integrations: &Integrations,
    ) -> Result<serde_json::Value, DispatchError> {
        match action {
            Action::SendEmail(email) => Ok(self.send_email(email)),
            Action::CreateLead(_) => Ok(self.create_lead()),
            Action::ApiCall(call) => self.api_call(call, context, integrations).await,
            Action::Delay(delay) => Ok(self.delay(delay)),
            Action::Unknown(unknown) => {
                let kind = if unknown.kind.is_empty() {
                    "<missing>".to_string()
                } else {
                    unknown.kind.clone()
                };
                Err(DispatchError::UnknownActionType(kind))
            }
        }
    }

    /// Acknowledge an email. Delivery happens outside the engine.
    fn send_email(&self, action: &SendEmailAction) -> serde_json::Value {
        json!({
            "sent": true,
            "recipient": action.recipient,
        })
    }

    /// Acknowledge a lead with a fresh identifier. Nothing is persisted.
    fn create_lead(&self) -> serde_json::Value {
        json!({
            "created": true,
            "leadId": format!("lead_{}", Uuid::new_v4().simple()),
        })
    }

    /// Acknowledge a delay without suspending the run.
    fn delay(&self, action: &DelayAction) -> serde_json::Value {
        json!({
            "delayed": true,
            "duration": action.duration,
        })
    }

    async fn api_call(
        &self,
        action: &ApiCallAction,
        context: &Context,
        integrations: &Integrations,
    ) -> Result<serde_json::Value, DispatchError> {
        let endpoint = action
            .endpoint
            .as_deref()
            .ok_or(DispatchError::MissingEndpoint)?;

        let integration = match &action.integration {
            Some(name) => Some(
                integrations
                    .get(name)
                    .ok_or_else(|| DispatchError::UnknownIntegration(name.clone()))?,
            ),
            None => None,
        };

        let unresolved = self.renderer.unresolved(endpoint, context);
        if !unresolved.is_empty() {
            debug!(placeholders = ?unresolved, "Endpoint placeholders left unresolved");
        }

        let mut url = self.renderer.render(endpoint, context);
        if let Some(base) = integration.and_then(integration_base_url) {
            url = resolve_endpoint(base, &url);
        }

        let method_name = action.method.as_deref().unwrap_or("GET").to_ascii_uppercase();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| DispatchError::InvalidMethod(method_name.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(extra) = integration.and_then(|cfg| cfg.get("headers")).and_then(|h| h.as_object()) {
            merge_headers(&mut headers, extra)?;
        }
        merge_headers(&mut headers, &action.headers)?;

        let body = match &action.body {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(self.renderer.render_json(value, context)?),
        };
        if body.is_some() && (method == Method::GET || method == Method::HEAD) {
            return Err(DispatchError::BodyNotAllowed(method));
        }

        info!(endpoint = %url, method = %method, "Executing API call");

        let mut request = self
            .client
            .request(method, &url)
            .headers(headers)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| DispatchError::InvalidResponse(e.to_string()))?;

        debug!(endpoint = %url, status = status.as_u16(), "API call completed");

        Ok(json!({
            "status": status.as_u16(),
            "success": status.is_success(),
            "data": data,
        }))
    }
}

#[async_trait]
impl ActionDispatch for ActionDispatcher {
    async fn execute(
        &self,
        action: &Action,
        context: &Context,
        integrations: &Integrations,
    ) -> ActionResult {
        let action_type = action.action_type();
        debug!(action = %action_type, "Executing action");

        match self.dispatch(action, context, integrations).await {
            Ok(result) => ActionResult::succeeded(action_type, result),
            Err(e) => {
                warn!(action = %action_type, error = %e, "Action failed");
                ActionResult::failed(action_type, e.to_string())
            }
        }
    }
}

fn integration_base_url(config: &serde_json::Value) -> Option<&str> {
    config
        .get("baseUrl")
        .or_else(|| config.get("base_url"))
        .and_then(|v| v.as_str())
}

/// Resolve a relative endpoint against an integration base URL.
///
/// Absolute endpoints are returned unchanged.
fn resolve_endpoint(base: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn merge_headers(
    headers: &mut HeaderMap,
    extra: &serde_json::Map<String, serde_json::Value>,
) -> Result<(), DispatchError> {
    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| DispatchError::InvalidHeader(name.clone()))?;
        let header_value = HeaderValue::from_str(&to_display_string(Some(value)))
            .map_err(|_| DispatchError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }
    Ok(())
}
