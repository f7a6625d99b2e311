//! HTTP surface for the task delivery system.
//!
//! One authenticated endpoint receives deliveries; the health probe stays
//! open. The response status code is the sole redelivery signal the queue
//! consumes.

pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

use crate::web::handlers::{execute_call_task, health};
use crate::web::middleware::require_task_auth;
use crate::web::state::AppState;

/// Build the application router. The task endpoint sits behind the
/// shared-secret gate; `/health` does not.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/call-tasks", post(execute_call_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_task_auth,
        ))
        .route("/health", get(health))
        .with_state(state)
}
