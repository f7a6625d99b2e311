#![allow(dead_code)] // Not every fake accessor is used by every test binary.

//! Recording fakes for the executor's collaborator seams.
//!
//! Each fake counts its calls so tests can assert not just outcomes but which
//! side effects did and did not happen.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use calltask_core::database::{LockStore, SessionDirectory};
use calltask_core::error::{CalltaskError, Result};
use calltask_core::execution::{CompensationTrigger, PreconditionChecker, TaskExecutor};
use calltask_core::models::{
    CallSession, ExecutionLock, LockPatch, ProviderAvailability,
};
use calltask_core::services::{CallOrchestrator, DialResult, OrchestratorFailure, PaymentGateway};

/// In-memory lock store with the same merge-upsert semantics as the Postgres
/// implementation.
#[derive(Default)]
pub struct InMemoryLockStore {
    pub locks: Mutex<HashMap<String, ExecutionLock>>,
    pub get_count: Mutex<u32>,
    pub upsert_count: Mutex<u32>,
    pub fail_reads: Mutex<bool>,
    /// When set, upserts beyond this count fail (1-based; 0 fails them all).
    pub fail_upserts_after: Mutex<Option<u32>>,
}

impl InMemoryLockStore {
    pub fn seed(&self, lock: ExecutionLock) {
        self.locks.lock().insert(lock.call_session_id.clone(), lock);
    }

    pub fn status_of(&self, call_session_id: &str) -> Option<String> {
        self.locks
            .lock()
            .get(call_session_id)
            .map(|l| l.status.clone())
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn get(&self, call_session_id: &str) -> Result<Option<ExecutionLock>> {
        *self.get_count.lock() += 1;
        if *self.fail_reads.lock() {
            return Err(CalltaskError::store("lock_get", "connection refused"));
        }
        Ok(self.locks.lock().get(call_session_id).cloned())
    }

    async fn upsert(&self, call_session_id: &str, patch: LockPatch) -> Result<()> {
        *self.upsert_count.lock() += 1;
        if let Some(allowed) = *self.fail_upserts_after.lock() {
            if *self.upsert_count.lock() > allowed {
                return Err(CalltaskError::store("lock_upsert", "connection refused"));
            }
        }
        let now = Utc::now();
        let mut locks = self.locks.lock();
        match locks.get_mut(call_session_id) {
            Some(existing) => {
                existing.status = patch.status.as_str().to_string();
                existing.updated_at = now;
                if patch.error.is_some() {
                    existing.error = patch.error;
                }
                if patch.completed_at.is_some() {
                    existing.completed_at = patch.completed_at;
                }
                if patch.failed_at.is_some() {
                    existing.failed_at = patch.failed_at;
                }
            }
            None => {
                locks.insert(
                    call_session_id.to_string(),
                    ExecutionLock {
                        call_session_id: call_session_id.to_string(),
                        status: patch.status.as_str().to_string(),
                        error: patch.error,
                        created_at: now,
                        updated_at: now,
                        completed_at: patch.completed_at,
                        failed_at: patch.failed_at,
                    },
                );
            }
        }
        Ok(())
    }
}

/// Static session/availability directory with read counters.
#[derive(Default)]
pub struct StaticDirectory {
    pub sessions: Mutex<HashMap<String, CallSession>>,
    pub availability: Mutex<HashMap<String, ProviderAvailability>>,
    pub session_reads: Mutex<u32>,
    pub availability_reads: Mutex<u32>,
}

impl StaticDirectory {
    pub fn with_session(self, session: CallSession) -> Self {
        self.sessions.lock().insert(session.id.clone(), session);
        self
    }

    pub fn with_availability(self, availability: ProviderAvailability) -> Self {
        self.availability
            .lock()
            .insert(availability.provider_id.clone(), availability);
        self
    }
}

#[async_trait]
impl SessionDirectory for StaticDirectory {
    async fn call_session(&self, id: &str) -> Result<Option<CallSession>> {
        *self.session_reads.lock() += 1;
        Ok(self.sessions.lock().get(id).cloned())
    }

    async fn provider_availability(
        &self,
        provider_id: &str,
    ) -> Result<Option<ProviderAvailability>> {
        *self.availability_reads.lock() += 1;
        Ok(self.availability.lock().get(provider_id).cloned())
    }
}

/// Orchestrator fake returning a configured result and recording every dial.
pub struct RecordingOrchestrator {
    pub response: Mutex<std::result::Result<DialResult, OrchestratorFailure>>,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingOrchestrator {
    pub fn succeeding(status: &str) -> Self {
        Self {
            response: Mutex::new(Ok(DialResult::with_status(status))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: OrchestratorFailure) -> Self {
        Self {
            response: Mutex::new(Err(failure)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CallOrchestrator for RecordingOrchestrator {
    async fn begin_outbound_call(
        &self,
        call_session_id: &str,
    ) -> std::result::Result<DialResult, OrchestratorFailure> {
        self.calls.lock().push(call_session_id.to_string());
        self.response.lock().clone()
    }
}

/// Payment gateway fake with a configurable hard-failure mode.
pub struct RecordingPayments {
    pub succeed: bool,
    pub cancellations: Mutex<Vec<(String, String, String)>>,
}

impl RecordingPayments {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            cancellations: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            cancellations: Mutex::new(Vec::new()),
        }
    }

    pub fn cancellation_count(&self) -> usize {
        self.cancellations.lock().len()
    }
}

#[async_trait]
impl PaymentGateway for RecordingPayments {
    async fn cancel_authorization(
        &self,
        call_session_id: &str,
        reason_code: &str,
        actor_tag: &str,
    ) -> Result<()> {
        self.cancellations.lock().push((
            call_session_id.to_string(),
            reason_code.to_string(),
            actor_tag.to_string(),
        ));
        if self.succeed {
            Ok(())
        } else {
            Err(CalltaskError::PaymentError(
                "authorization already captured".to_string(),
            ))
        }
    }
}

pub fn session(id: &str, provider_id: Option<&str>) -> CallSession {
    let now = Utc::now();
    CallSession {
        id: id.to_string(),
        provider_id: provider_id.map(str::to_string),
        status: "scheduled".to_string(),
        scheduled_at: Some(now),
        created_at: now,
        updated_at: now,
    }
}

pub fn availability(provider_id: &str, status: &str) -> ProviderAvailability {
    ProviderAvailability {
        provider_id: provider_id.to_string(),
        status: status.to_string(),
        updated_at: Utc::now(),
    }
}

pub fn lock(call_session_id: &str, status: &str, updated_at: DateTime<Utc>) -> ExecutionLock {
    ExecutionLock {
        call_session_id: call_session_id.to_string(),
        status: status.to_string(),
        error: None,
        created_at: updated_at,
        updated_at,
        completed_at: None,
        failed_at: None,
    }
}

/// A full fixture: executor wired to recording fakes, plus handles to them.
pub struct Harness {
    pub executor: Arc<TaskExecutor>,
    pub locks: Arc<InMemoryLockStore>,
    pub directory: Arc<StaticDirectory>,
    pub orchestrator: Arc<RecordingOrchestrator>,
    pub payments: Arc<RecordingPayments>,
}

pub const FRESHNESS_SECS: u64 = 600;

pub fn harness(
    directory: StaticDirectory,
    orchestrator: RecordingOrchestrator,
    payments: RecordingPayments,
) -> Harness {
    let locks = Arc::new(InMemoryLockStore::default());
    let directory = Arc::new(directory);
    let orchestrator = Arc::new(orchestrator);
    let payments = Arc::new(payments);

    let executor = Arc::new(TaskExecutor::new(
        locks.clone(),
        PreconditionChecker::new(directory.clone()),
        CompensationTrigger::new(payments.clone()),
        orchestrator.clone(),
        FRESHNESS_SECS,
    ));

    Harness {
        executor,
        locks,
        directory,
        orchestrator,
        payments,
    }
}

/// Harness for the common happy-path fixture: session `cs_1` assigned to an
/// available provider `pr_1`, orchestrator reporting "initiated".
pub fn happy_path_harness() -> Harness {
    harness(
        StaticDirectory::default()
            .with_session(session("cs_1", Some("pr_1")))
            .with_availability(availability("pr_1", "available")),
        RecordingOrchestrator::succeeding("initiated"),
        RecordingPayments::succeeding(),
    )
}
