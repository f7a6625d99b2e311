//! Call orchestrator seam: "begin outbound call for session X".

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Provider-reported outcome of a dial attempt. Opaque beyond `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialResult {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DialResult {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A failed dial attempt, carried as raw material for the error classifier.
///
/// `error_type` is the collaborator's declared type tag (e.g. a fetch or
/// abort failure from its HTTP stack), when one is known.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorFailure {
    pub message: String,
    pub error_type: Option<String>,
}

impl OrchestratorFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
        }
    }

    pub fn with_type(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: Some(error_type.into()),
        }
    }
}

impl std::fmt::Display for OrchestratorFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// External component that actually places the outbound telephony call.
#[async_trait]
pub trait CallOrchestrator: Send + Sync {
    async fn begin_outbound_call(
        &self,
        call_session_id: &str,
    ) -> Result<DialResult, OrchestratorFailure>;
}

/// Configuration for the orchestrator HTTP client.
#[derive(Debug, Clone)]
pub struct OrchestratorClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for OrchestratorClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// HTTP client for the call orchestrator service.
#[derive(Debug, Clone)]
pub struct HttpCallOrchestrator {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BeginCallRequest<'a> {
    call_session_id: &'a str,
}

impl HttpCallOrchestrator {
    pub fn new(config: OrchestratorClientConfig) -> Result<Self, crate::error::CalltaskError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            crate::error::CalltaskError::ConfigurationError(format!(
                "Invalid orchestrator base URL: {e}"
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                crate::error::CalltaskError::ConfigurationError(format!(
                    "Failed to build orchestrator HTTP client: {e}"
                ))
            })?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CallOrchestrator for HttpCallOrchestrator {
    async fn begin_outbound_call(
        &self,
        call_session_id: &str,
    ) -> Result<DialResult, OrchestratorFailure> {
        let url = self.base_url.join("v1/calls").map_err(|e| {
            OrchestratorFailure::new(format!("Invalid orchestrator endpoint: {e}"))
        })?;

        debug!(call_session_id = %call_session_id, url = %url, "Dispatching outbound call");

        let response = self
            .client
            .post(url)
            .json(&BeginCallRequest { call_session_id })
            .send()
            .await
            .map_err(|e| {
                let error_type = if e.is_timeout() {
                    "AbortError"
                } else {
                    "FetchError"
                };
                OrchestratorFailure::with_type(e.to_string(), error_type)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                call_session_id = %call_session_id,
                http_status = %status,
                "Call orchestrator rejected dial request"
            );
            return Err(OrchestratorFailure::new(format!(
                "Call orchestrator returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<DialResult>()
            .await
            .map_err(|e| OrchestratorFailure::new(format!("Malformed orchestrator response: {e}")))
    }
}
