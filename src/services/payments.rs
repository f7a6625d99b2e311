//! Payment engine seam: cancellation of a held authorization.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::CalltaskError;

/// External payment-authorization subsystem.
///
/// Only cancellation is consumed here; authorization and capture belong to
/// the booking flow.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn cancel_authorization(
        &self,
        call_session_id: &str,
        reason_code: &str,
        actor_tag: &str,
    ) -> Result<(), CalltaskError>;
}

/// Configuration for the payment gateway HTTP client.
#[derive(Debug, Clone)]
pub struct PaymentClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for PaymentClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8091".to_string(),
            timeout_ms: 15_000,
        }
    }
}

/// HTTP client for the payment-authorization service.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelAuthorizationRequest<'a> {
    call_session_id: &'a str,
    reason_code: &'a str,
    actor_tag: &'a str,
}

impl HttpPaymentGateway {
    pub fn new(config: PaymentClientConfig) -> Result<Self, CalltaskError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CalltaskError::ConfigurationError(format!("Invalid payments base URL: {e}"))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                CalltaskError::ConfigurationError(format!(
                    "Failed to build payments HTTP client: {e}"
                ))
            })?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn cancel_authorization(
        &self,
        call_session_id: &str,
        reason_code: &str,
        actor_tag: &str,
    ) -> Result<(), CalltaskError> {
        let url = self.base_url.join("v1/authorizations/cancel").map_err(|e| {
            CalltaskError::PaymentError(format!("Invalid payments endpoint: {e}"))
        })?;

        debug!(
            call_session_id = %call_session_id,
            reason_code = %reason_code,
            "Requesting authorization cancellation"
        );

        let response = self
            .client
            .post(url)
            .json(&CancelAuthorizationRequest {
                call_session_id,
                reason_code,
                actor_tag,
            })
            .send()
            .await
            .map_err(|e| CalltaskError::PaymentError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalltaskError::PaymentError(format!(
                "Payment engine returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(())
    }
}
