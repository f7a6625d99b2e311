//! Crate-level error types for the call-task execution core.

use thiserror::Error;

/// Errors raised by the call-task core's own infrastructure.
///
/// Failures of the external call orchestrator are deliberately *not* part of
/// this enum: they are carried as [`crate::services::OrchestratorFailure`]
/// values so the error classifier can inspect the raw message and type tag.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalltaskError {
    #[error("Store error during {operation}: {reason}")]
    StoreError { operation: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Payment gateway error: {0}")]
    PaymentError(String),
}

impl CalltaskError {
    pub fn store(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StoreError {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalltaskError>;
