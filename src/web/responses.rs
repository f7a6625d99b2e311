//! Response bodies returned to the task delivery system.
//!
//! Field names are camelCase on the wire for compatibility with the existing
//! queue callers. The HTTP status code, not the body, is the redelivery
//! signal: 500 means redeliver, anything 2xx means do not.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::execution::ExecutionOutcome;
use crate::services::DialResult;

/// 200: duplicate delivery short-circuited by the idempotency gate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdempotentResponse {
    pub success: bool,
    pub message: String,
    pub call_session_id: String,
    pub idempotent: bool,
}

/// 200: preconditions failed terminally; redelivery will not help.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUnavailableResponse {
    pub success: bool,
    pub error: String,
    pub call_session_id: String,
    pub provider_status: String,
    pub payment_cancelled: bool,
}

/// 200: the orchestrator accepted the dial.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSuccessResponse {
    pub success: bool,
    pub call_session_id: String,
    pub execution_time_ms: u64,
    pub result: DialResult,
    pub timestamp: String,
}

/// 200 (permanent, `handled:true`) or 500 (transient, `handled:false`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFailureResponse {
    pub success: bool,
    pub error: String,
    pub call_session_id: String,
    pub execution_time_ms: u64,
    pub timestamp: String,
    pub handled: bool,
    pub transient: bool,
}

/// 400: payload did not carry a usable `callSessionId`. Lists the top-level
/// keys actually present for diagnosability.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingPayloadResponse {
    pub success: bool,
    pub error: String,
    pub available_keys: Vec<String>,
}

/// Map an execution outcome onto the wire contract.
pub fn outcome_response(call_session_id: &str, outcome: ExecutionOutcome) -> Response {
    match outcome {
        ExecutionOutcome::Duplicate { lock_status } => (
            StatusCode::OK,
            Json(IdempotentResponse {
                success: true,
                message: format!("Call already {lock_status}"),
                call_session_id: call_session_id.to_string(),
                idempotent: true,
            }),
        )
            .into_response(),

        ExecutionOutcome::ProviderUnavailable {
            provider_status,
            payment_cancelled,
        } => (
            StatusCode::OK,
            Json(ProviderUnavailableResponse {
                success: false,
                error: "Provider no longer available".to_string(),
                call_session_id: call_session_id.to_string(),
                provider_status,
                payment_cancelled,
            }),
        )
            .into_response(),

        ExecutionOutcome::Completed {
            result,
            execution_time_ms,
        } => (
            StatusCode::OK,
            Json(ExecutionSuccessResponse {
                success: true,
                call_session_id: call_session_id.to_string(),
                execution_time_ms,
                result,
                timestamp: Utc::now().to_rfc3339(),
            }),
        )
            .into_response(),

        ExecutionOutcome::Failed {
            error,
            classification,
            execution_time_ms,
        } => {
            let transient = classification.is_transient();
            let status = if transient {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(ExecutionFailureResponse {
                    success: false,
                    error,
                    call_session_id: call_session_id.to_string(),
                    execution_time_ms,
                    timestamp: Utc::now().to_rfc3339(),
                    handled: !transient,
                    transient,
                }),
            )
                .into_response()
        }
    }
}
