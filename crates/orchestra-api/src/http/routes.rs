//! HTTP route definitions.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};

use crate::http::handlers;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/run-graph", post(handlers::run_graph))
        .route("/status/{workflow_id}", get(handlers::workflow_status))
        .route("/workflows", get(handlers::list_workflows))
        .route("/workflows/{workflow_id}", delete(handlers::delete_workflow))
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
