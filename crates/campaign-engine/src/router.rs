//! HTTP router.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .with_state(state.clone());

    let execution_routes = Router::new()
        .route("/workflows/{id}/execute", post(handlers::execute))
        .route(
            "/workflows/{id}/executions",
            get(handlers::executions::list),
        )
        .with_state(state.executions.clone());

    let workflow_routes = Router::new()
        .route(
            "/workflows/{id}/activate",
            post(handlers::workflows::activate),
        )
        .route(
            "/workflows/{id}/deactivate",
            post(handlers::workflows::deactivate),
        )
        .with_state(state.workflows);

    Router::new()
        .merge(health_routes)
        .merge(execution_routes)
        .merge(workflow_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
