use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{CalltaskError, Result};
use crate::models::{ExecutionLock, LockPatch};

/// Persistence seam for [`ExecutionLock`] records.
///
/// Writes are merge-style upserts: repeated writes of the same status are
/// safe, and unset fields never clobber stored ones. The task executor is the
/// single logical writer.
#[async_trait]
pub trait LockStore: Send + Sync {
    async fn get(&self, call_session_id: &str) -> Result<Option<ExecutionLock>>;

    async fn upsert(&self, call_session_id: &str, patch: LockPatch) -> Result<()>;
}

/// Postgres-backed lock store.
#[derive(Debug, Clone)]
pub struct PgLockStore {
    pool: PgPool,
}

impl PgLockStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LockStore for PgLockStore {
    async fn get(&self, call_session_id: &str) -> Result<Option<ExecutionLock>> {
        ExecutionLock::find_by_call_session_id(&self.pool, call_session_id)
            .await
            .map_err(|e| CalltaskError::store("lock_get", e.to_string()))
    }

    async fn upsert(&self, call_session_id: &str, patch: LockPatch) -> Result<()> {
        ExecutionLock::upsert(&self.pool, call_session_id, &patch)
            .await
            .map_err(|e| CalltaskError::store("lock_upsert", e.to_string()))
    }
}
