//! Router-level tests against the in-memory backend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use campaign_engine::config::{AppConfig, StorageBackend};
use campaign_engine::engine::WorkflowExecutor;
use campaign_engine::router::build_router;
use campaign_engine::state::AppState;
use campaign_engine::store::{MemoryExecutionStore, MemoryWorkflowSource};
use campaign_engine::workflow::Workflow;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_app(workflows: Value) -> axum::Router {
    let workflows: Vec<Workflow> = serde_json::from_value(workflows).unwrap();
    let config = AppConfig {
        storage: StorageBackend::Memory,
        ..AppConfig::default()
    };
    let state = AppState::new(
        config,
        Arc::new(MemoryWorkflowSource::with_workflows(workflows)),
        Arc::new(MemoryExecutionStore::new()),
        WorkflowExecutor::default(),
    );
    build_router(state)
}

fn default_workflows() -> Value {
    json!([
        {
            "id": "1",
            "name": "Welcome adults",
            "triggers": [{"event": "signup"}],
            "conditions": [{"field": "age", "operator": "greater_than", "value": "17"}],
            "actions": [
                {"type": "delay", "duration": 60},
                {"type": "unknown_type"},
                {"type": "send_email", "recipient": "{{email}}"}
            ]
        },
        {
            "id": "2",
            "name": "Paused",
            "isActive": false,
            "triggers": [],
            "actions": [{"type": "create_lead"}]
        }
    ])
}

fn post(uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method("POST").uri(uri);
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let app = make_app(json!([]));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "connected");
    assert_eq!(body["backend"], "memory");
}

// ---------------------------------------------------------------------------
// Execute
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_execute_mixed_outcome() {
    let app = make_app(default_workflows());

    let (status, body) = send(
        &app,
        post(
            "/workflows/1/execute",
            Some(json!({"context": {"age": 30, "email": "ada@example.com"}})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["actionsExecuted"], 3);
    assert!(body["executionId"].as_str().unwrap().starts_with("exec_"));
    assert!(body.get("executedAt").is_some());

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["action"], "delay");
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[1]["error"], "Unknown action type: unknown_type");
    assert_eq!(results[2]["result"]["sent"], true);
}

#[tokio::test]
async fn test_execute_conditions_not_met() {
    let app = make_app(default_workflows());

    let (status, body) = send(
        &app,
        post("/workflows/1/execute", Some(json!({"context": {"age": 12}}))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["reason"], "Workflow conditions not met");
    assert_eq!(body["actionsExecuted"], 0);
    assert_eq!(body["results"], json!([]));

    // The rejected run is still part of the history.
    let (_, history) = send(&app, get("/workflows/1/executions")).await;
    assert_eq!(history["meta"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_execute_without_body_uses_empty_context() {
    let app = make_app(default_workflows());

    let (status, body) = send(&app, post("/workflows/1/execute", None)).await;

    // `age` is missing, so greater_than compares NaN and the gate rejects.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_execute_not_found() {
    let app = make_app(default_workflows());

    let (status, body) = send(&app, post("/workflows/missing/execute", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_execute_inactive() {
    let app = make_app(default_workflows());

    let (status, body) = send(&app, post("/workflows/2/execute", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Workflow is not active");
}

#[tokio::test]
async fn test_execute_malformed_body() {
    let app = make_app(default_workflows());

    let request = Request::builder()
        .method("POST")
        .uri("/workflows/1/execute")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_execute_api_call_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crm/leads/ada"))
        .and(body_json(json!({"email": "ada@example.com", "campaign": "{{campaign}}"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "L-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = make_app(json!([{
        "id": "sync",
        "name": "CRM sync",
        "triggers": [],
        "apiIntegrations": {"crm": {"baseUrl": format!("{}/crm", server.uri())}},
        "actions": [{
            "type": "api_call",
            "integration": "crm",
            "endpoint": "/leads/{{user}}",
            "method": "POST",
            "body": {"email": "{{email}}", "campaign": "{{campaign}}"}
        }]
    }]));

    let (status, body) = send(
        &app,
        post(
            "/workflows/sync/execute",
            Some(json!({"context": {"user": "ada", "email": "ada@example.com"}})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["results"][0];
    assert_eq!(result["success"], true);
    assert_eq!(result["result"]["status"], 201);
    assert_eq!(result["result"]["success"], true);
    assert_eq!(result["result"]["data"]["id"], "L-1");
}

// ---------------------------------------------------------------------------
// Executions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_executions_second_page() {
    let app = make_app(default_workflows());

    let mut ids = Vec::new();
    for i in 0..30 {
        let (status, body) = send(
            &app,
            post("/workflows/1/execute", Some(json!({"context": {"age": 20 + i}}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(body["executionId"].as_str().unwrap().to_string());
    }

    let (status, body) = send(&app, get("/workflows/1/executions?page=2&pageSize=10")).await;
    assert_eq!(status, StatusCode::OK);

    let pagination = &body["meta"]["pagination"];
    assert_eq!(pagination["page"], 2);
    assert_eq!(pagination["pageSize"], 10);
    assert_eq!(pagination["total"], 30);
    assert_eq!(pagination["pageCount"], 3);

    let page_ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["executionId"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = ids[10..20].iter().rev().map(String::as_str).collect();
    assert_eq!(page_ids, expected);
}

#[tokio::test]
async fn test_executions_defaults_and_clamping() {
    let app = make_app(default_workflows());

    let (status, body) = send(&app, get("/workflows/1/executions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["pagination"]["page"], 1);
    assert_eq!(body["meta"]["pagination"]["pageSize"], 25);
    assert_eq!(body["meta"]["pagination"]["pageCount"], 0);

    let (_, body) = send(&app, get("/workflows/1/executions?page=0&pageSize=500")).await;
    assert_eq!(body["meta"]["pagination"]["page"], 1);
    assert_eq!(body["meta"]["pagination"]["pageSize"], 100);
}

#[tokio::test]
async fn test_executions_huge_page() {
    let app = make_app(default_workflows());
    send(&app, post("/workflows/1/execute", Some(json!({"context": {"age": 30}})))).await;

    let (status, body) = send(
        &app,
        get("/workflows/1/executions?page=9223372036854775807&pageSize=10"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["pagination"]["total"], 1);
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_activate_then_execute() {
    let app = make_app(default_workflows());

    let (status, body) = send(&app, post("/workflows/2/activate", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], true);

    let (status, body) = send(&app, post("/workflows/2/execute", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["results"][0]["result"]["created"], true);

    let (status, _) = send(&app, post("/workflows/2/deactivate", None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, post("/workflows/2/execute", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activate_missing() {
    let app = make_app(json!([]));

    let (status, _) = send(&app, post("/workflows/none/activate", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
