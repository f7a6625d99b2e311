//! # Task Authentication Middleware
//!
//! Shared-secret authentication for the task delivery endpoint. The secret is
//! compared byte-for-byte; the check is constant-work and side-effect-free,
//! and runs before any lock or session read.
//!
//! The 401 bodies are plain text rather than JSON. Existing delivery-system
//! callers match on these exact strings, so the asymmetry with the JSON
//! bodies elsewhere is preserved deliberately.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::web::state::AppState;

pub const TASK_AUTH_HEADER: &str = "x-task-auth";

pub async fn require_task_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(header) = request.headers().get(TASK_AUTH_HEADER) else {
        warn!("Task delivery rejected: missing auth header");
        return (StatusCode::UNAUTHORIZED, "Missing X-Task-Auth header").into_response();
    };

    if header.as_bytes() != state.task_auth_secret.as_bytes() {
        warn!("Task delivery rejected: invalid auth header");
        return (StatusCode::UNAUTHORIZED, "Invalid X-Task-Auth header").into_response();
    }

    next.run(request).await
}
