//! Precondition re-check run immediately before placing a call.
//!
//! The availability snapshot consulted at enqueue time is allowed to be
//! stale; this second read right before the dial is what actually gates the
//! attempt.

use std::sync::Arc;

use crate::database::SessionDirectory;
use crate::error::Result;
use crate::models::CallSession;

/// Outcome of the precondition re-check.
#[derive(Debug, Clone, PartialEq)]
pub enum PreconditionVerdict {
    /// Session exists and its provider (if any) is available.
    Ready(CallSession),
    /// No such session; redelivery cannot materialize one.
    SessionMissing,
    /// Provider is assigned but not available; carries the observed status.
    ProviderUnavailable { provider_status: String },
}

/// Re-reads live session and provider state through the directory seam.
pub struct PreconditionChecker {
    directory: Arc<dyn SessionDirectory>,
}

impl PreconditionChecker {
    pub fn new(directory: Arc<dyn SessionDirectory>) -> Self {
        Self { directory }
    }

    pub async fn check(&self, call_session_id: &str) -> Result<PreconditionVerdict> {
        let Some(session) = self.directory.call_session(call_session_id).await? else {
            return Ok(PreconditionVerdict::SessionMissing);
        };

        let provider_id = match session.provider_id.clone() {
            Some(provider_id) => provider_id,
            // Unassigned sessions are dialed as-is; provider matching is the
            // booking subsystem's concern.
            None => return Ok(PreconditionVerdict::Ready(session)),
        };

        match self.directory.provider_availability(&provider_id).await? {
            Some(availability) if availability.permits_call() => {
                Ok(PreconditionVerdict::Ready(session))
            }
            Some(availability) => Ok(PreconditionVerdict::ProviderUnavailable {
                provider_status: availability.status,
            }),
            // No availability record reads as unconfirmed, which does not
            // permit a call attempt.
            None => Ok(PreconditionVerdict::ProviderUnavailable {
                provider_status: "unknown".to_string(),
            }),
        }
    }
}
