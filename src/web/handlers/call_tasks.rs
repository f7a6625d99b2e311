//! # Call-Task Delivery Handler
//!
//! The single endpoint the task delivery system invokes. Authentication has
//! already happened in middleware; this handler validates the payload, runs
//! the executor, and maps the outcome onto the wire contract.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::web::responses::{outcome_response, MissingPayloadResponse};
use crate::web::state::AppState;

/// Execute a delivered call task: POST /v1/call-tasks
///
/// The body is accepted as arbitrary JSON so a malformed payload can be
/// answered with the list of keys that were actually present.
pub async fn execute_call_task(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let call_session_id = body
        .get("callSessionId")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());

    let Some(call_session_id) = call_session_id else {
        let available_keys = body
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        return (
            StatusCode::BAD_REQUEST,
            Json(MissingPayloadResponse {
                success: false,
                error: "Missing callSessionId in request body".to_string(),
                available_keys,
            }),
        )
            .into_response();
    };

    info!(call_session_id = %call_session_id, "Call task delivery received");

    let outcome = state.executor.execute(call_session_id).await;
    outcome_response(call_session_id, outcome)
}
