//! The orchestrating entry point for one call-task delivery.
//!
//! Each delivery is handled by an independent, stateless invocation; the
//! persisted lock is the only shared state across invocations. Every error is
//! absorbed here and turned into a deliberate [`ExecutionOutcome`] — nothing
//! propagates to the transport layer as an unhandled error.

use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::database::LockStore;
use crate::execution::error_classifier::{classify_failure, FailureClass};
use crate::execution::compensation::CompensationTrigger;
use crate::execution::preconditions::{PreconditionChecker, PreconditionVerdict};
use crate::logging::{log_error, log_execution_step};
use crate::models::LockPatch;
use crate::services::{CallOrchestrator, DialResult};

/// Reason code reported to the payment engine for an abandoned call.
const REASON_PROVIDER_UNAVAILABLE: &str = "provider_unavailable";

/// Terminal result of one execution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// A live or recently finished duplicate; this delivery did no work.
    Duplicate { lock_status: String },
    /// Preconditions failed terminally; compensation was triggered.
    ProviderUnavailable {
        provider_status: String,
        payment_cancelled: bool,
    },
    /// The orchestrator accepted the dial.
    Completed {
        result: DialResult,
        execution_time_ms: u64,
    },
    /// The attempt failed; classification decides redelivery.
    Failed {
        error: String,
        classification: FailureClass,
        execution_time_ms: u64,
    },
}

/// Ties the lock gate, precondition check, dial invocation, failure
/// classification, and compensation together for one delivery.
pub struct TaskExecutor {
    locks: Arc<dyn LockStore>,
    preconditions: PreconditionChecker,
    compensation: CompensationTrigger,
    orchestrator: Arc<dyn CallOrchestrator>,
    freshness_window: Duration,
}

impl TaskExecutor {
    pub fn new(
        locks: Arc<dyn LockStore>,
        preconditions: PreconditionChecker,
        compensation: CompensationTrigger,
        orchestrator: Arc<dyn CallOrchestrator>,
        freshness_window_secs: u64,
    ) -> Self {
        Self {
            locks,
            preconditions,
            compensation,
            orchestrator,
            freshness_window: Duration::seconds(freshness_window_secs as i64),
        }
    }

    /// Execute one delivered call task.
    ///
    /// The caller has already authenticated the delivery and validated that
    /// `call_session_id` is present and non-empty.
    pub async fn execute(&self, call_session_id: &str) -> ExecutionOutcome {
        let started = Instant::now();

        // Idempotency gate. The read-then-write is not atomic: two deliveries
        // racing inside the window before either writes "executing" can both
        // proceed. Accepted limitation; the orchestrator is assumed idempotent.
        let existing = match self.locks.get(call_session_id).await {
            Ok(lock) => lock,
            Err(e) => {
                log_error("lock_store", "lock_get", &e.to_string(), Some(call_session_id));
                return self.infrastructure_failure(e.to_string(), started);
            }
        };

        if let Some(lock) = existing {
            if lock.is_live(Utc::now(), self.freshness_window) {
                info!(
                    call_session_id = %call_session_id,
                    lock_status = %lock.status,
                    "Duplicate delivery short-circuited"
                );
                return ExecutionOutcome::Duplicate {
                    lock_status: lock.status,
                };
            }
        }

        // Point of no return for this attempt.
        if let Err(e) = self
            .locks
            .upsert(call_session_id, LockPatch::executing())
            .await
        {
            log_error("lock_store", "upsert_executing", &e.to_string(), Some(call_session_id));
            return self.infrastructure_failure(e.to_string(), started);
        }
        log_execution_step("lock_acquired", call_session_id, "executing", None);

        // Re-check real-world preconditions right before dialing.
        let verdict = match self.preconditions.check(call_session_id).await {
            Ok(verdict) => verdict,
            Err(e) => {
                self.record_failure(call_session_id, &e.to_string()).await;
                return self.infrastructure_failure(e.to_string(), started);
            }
        };

        match verdict {
            PreconditionVerdict::SessionMissing => {
                let message = format!("Call session {call_session_id} not found");
                self.record_failure(call_session_id, &message).await;
                ExecutionOutcome::Failed {
                    error: message,
                    classification: FailureClass::Permanent,
                    execution_time_ms: elapsed_ms(started),
                }
            }
            PreconditionVerdict::ProviderUnavailable { provider_status } => {
                log_execution_step(
                    "precondition_check",
                    call_session_id,
                    "provider_unavailable",
                    Some(&provider_status),
                );

                if let Err(e) = self
                    .locks
                    .upsert(
                        call_session_id,
                        LockPatch::aborted_provider_unavailable(Utc::now()),
                    )
                    .await
                {
                    log_error("lock_store", "upsert_aborted", &e.to_string(), Some(call_session_id));
                }

                let payment_cancelled = self
                    .compensation
                    .cancel_payment(call_session_id, REASON_PROVIDER_UNAVAILABLE)
                    .await;

                ExecutionOutcome::ProviderUnavailable {
                    provider_status,
                    payment_cancelled,
                }
            }
            PreconditionVerdict::Ready(_session) => {
                self.dispatch_call(call_session_id, started).await
            }
        }
    }

    async fn dispatch_call(&self, call_session_id: &str, started: Instant) -> ExecutionOutcome {
        log_execution_step("dial", call_session_id, "dispatching", None);

        match self.orchestrator.begin_outbound_call(call_session_id).await {
            Ok(result) => {
                if let Err(e) = self
                    .locks
                    .upsert(call_session_id, LockPatch::completed(Utc::now()))
                    .await
                {
                    // The dial went out but we could not record it. Report a
                    // transient failure so the delivery system redelivers and
                    // a later attempt reconciles the lock.
                    log_error("lock_store", "upsert_completed", &e.to_string(), Some(call_session_id));
                    return self.infrastructure_failure(e.to_string(), started);
                }

                info!(
                    call_session_id = %call_session_id,
                    result_status = %result.status,
                    "Outbound call initiated"
                );
                ExecutionOutcome::Completed {
                    result,
                    execution_time_ms: elapsed_ms(started),
                }
            }
            Err(failure) => {
                let classification =
                    classify_failure(&failure.message, failure.error_type.as_deref());
                warn!(
                    call_session_id = %call_session_id,
                    error = %failure.message,
                    classification = %classification,
                    "Outbound call failed"
                );
                self.record_failure(call_session_id, &failure.message).await;
                ExecutionOutcome::Failed {
                    error: failure.message,
                    classification,
                    execution_time_ms: elapsed_ms(started),
                }
            }
        }
    }

    /// Best-effort transition to "failed"; a write error here must not mask
    /// the failure being reported.
    async fn record_failure(&self, call_session_id: &str, message: &str) {
        if let Err(e) = self
            .locks
            .upsert(call_session_id, LockPatch::failed(message, Utc::now()))
            .await
        {
            log_error("lock_store", "upsert_failed", &e.to_string(), Some(call_session_id));
        }
    }

    /// Failures of the crate's own stores are transient by definition: the
    /// delivery system should redeliver once the infrastructure recovers.
    fn infrastructure_failure(&self, message: String, started: Instant) -> ExecutionOutcome {
        ExecutionOutcome::Failed {
            error: message,
            classification: FailureClass::Transient,
            execution_time_ms: elapsed_ms(started),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
