//! Compensating action for call sessions that can no longer run: cancel the
//! payment authorization held when the call was booked.

use std::sync::Arc;
use tracing::warn;

use crate::logging::log_compensation;
use crate::services::PaymentGateway;

/// Actor tag reported to the payment engine for audit trails.
const ACTOR_TAG: &str = "call-task-executor";

/// Triggers payment cancellation when a queued call is abandoned.
pub struct CompensationTrigger {
    payments: Arc<dyn PaymentGateway>,
}

impl CompensationTrigger {
    pub fn new(payments: Arc<dyn PaymentGateway>) -> Self {
        Self { payments }
    }

    /// Cancel/refund the held authorization for a session.
    ///
    /// Returns whether the cancellation succeeded. A failure is logged and
    /// surfaced as `false`, never propagated: the caller still needs to
    /// report the aborted call even when the refund requires manual
    /// follow-up.
    pub async fn cancel_payment(&self, call_session_id: &str, reason_code: &str) -> bool {
        match self
            .payments
            .cancel_authorization(call_session_id, reason_code, ACTOR_TAG)
            .await
        {
            Ok(()) => {
                log_compensation(call_session_id, reason_code, true);
                true
            }
            Err(e) => {
                warn!(
                    call_session_id = %call_session_id,
                    reason_code = %reason_code,
                    error = %e,
                    "Payment cancellation failed; needs reconciliation"
                );
                log_compensation(call_session_id, reason_code, false);
                false
            }
        }
    }
}
