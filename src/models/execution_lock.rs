//! Persisted idempotency lock, one row per call session.
//!
//! The lock is created on the first execution attempt, updated in place on
//! every subsequent attempt, and never deleted. The task executor is the only
//! writer; its status advances monotonically through the attempt lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Lifecycle states of an execution lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    Executing,
    Completed,
    Failed,
    AbortedProviderUnavailable,
}

impl LockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockStatus::Executing => "executing",
            LockStatus::Completed => "completed",
            LockStatus::Failed => "failed",
            LockStatus::AbortedProviderUnavailable => "aborted_provider_unavailable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "executing" => Some(LockStatus::Executing),
            "completed" => Some(LockStatus::Completed),
            "failed" => Some(LockStatus::Failed),
            "aborted_provider_unavailable" => Some(LockStatus::AbortedProviderUnavailable),
            _ => None,
        }
    }
}

impl std::fmt::Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps to the `call_execution_locks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ExecutionLock {
    pub call_session_id: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl ExecutionLock {
    /// Whether this lock is proof of a live or recently finished execution.
    ///
    /// Only `executing` and `completed` locks dedup a redelivery, and only
    /// while their last touch is within the freshness window. `failed` and
    /// `aborted_*` locks never short-circuit: a later delivery re-attempts.
    pub fn is_live(&self, now: DateTime<Utc>, freshness_window: Duration) -> bool {
        match LockStatus::parse(&self.status) {
            Some(LockStatus::Executing) | Some(LockStatus::Completed) => {
                now.signed_duration_since(self.updated_at) <= freshness_window
            }
            _ => false,
        }
    }

    pub async fn find_by_call_session_id(
        pool: &PgPool,
        call_session_id: &str,
    ) -> Result<Option<ExecutionLock>, sqlx::Error> {
        sqlx::query_as::<_, ExecutionLock>(
            r#"
            SELECT call_session_id, status, error, created_at, updated_at, completed_at, failed_at
            FROM call_execution_locks
            WHERE call_session_id = $1
            "#,
        )
        .bind(call_session_id)
        .fetch_optional(pool)
        .await
    }

    /// Merge-style upsert: unset patch fields never clobber stored values.
    ///
    /// There is intentionally no compare-and-swap here. The read-then-write
    /// dedup in the executor tolerates concurrent redeliveries racing inside
    /// the freshness window as a best-effort dedup, not strict exactly-once.
    pub async fn upsert(
        pool: &PgPool,
        call_session_id: &str,
        patch: &LockPatch,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO call_execution_locks
                (call_session_id, status, error, created_at, updated_at, completed_at, failed_at)
            VALUES ($1, $2, $3, NOW(), NOW(), $4, $5)
            ON CONFLICT (call_session_id) DO UPDATE SET
                status = EXCLUDED.status,
                updated_at = NOW(),
                error = COALESCE(EXCLUDED.error, call_execution_locks.error),
                completed_at = COALESCE(EXCLUDED.completed_at, call_execution_locks.completed_at),
                failed_at = COALESCE(EXCLUDED.failed_at, call_execution_locks.failed_at)
            "#,
        )
        .bind(call_session_id)
        .bind(patch.status.as_str())
        .bind(&patch.error)
        .bind(patch.completed_at)
        .bind(patch.failed_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// Fields written by a single lock transition.
#[derive(Debug, Clone, PartialEq)]
pub struct LockPatch {
    pub status: LockStatus,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl LockPatch {
    /// Point of no return for an attempt: mark the lock executing.
    pub fn executing() -> Self {
        Self {
            status: LockStatus::Executing,
            error: None,
            completed_at: None,
            failed_at: None,
        }
    }

    pub fn completed(now: DateTime<Utc>) -> Self {
        Self {
            status: LockStatus::Completed,
            error: None,
            completed_at: Some(now),
            failed_at: None,
        }
    }

    pub fn failed(error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            status: LockStatus::Failed,
            error: Some(error.into()),
            completed_at: None,
            failed_at: Some(now),
        }
    }

    pub fn aborted_provider_unavailable(now: DateTime<Utc>) -> Self {
        Self {
            status: LockStatus::AbortedProviderUnavailable,
            error: Some("Provider no longer available".to_string()),
            completed_at: None,
            failed_at: Some(now),
        }
    }
}
