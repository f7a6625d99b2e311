use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{CalltaskError, Result};
use crate::models::{CallSession, ProviderAvailability};

/// Read-only lookups of booking-subsystem state.
///
/// Both reads happen immediately before placing a call, not only at enqueue
/// time: the snapshot may be stale by then and the second check is the point.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    async fn call_session(&self, id: &str) -> Result<Option<CallSession>>;

    async fn provider_availability(
        &self,
        provider_id: &str,
    ) -> Result<Option<ProviderAvailability>>;
}

/// Postgres-backed session/provider directory.
#[derive(Debug, Clone)]
pub struct PgSessionDirectory {
    pool: PgPool,
}

impl PgSessionDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionDirectory for PgSessionDirectory {
    async fn call_session(&self, id: &str) -> Result<Option<CallSession>> {
        CallSession::find_by_id(&self.pool, id)
            .await
            .map_err(|e| CalltaskError::store("call_session_get", e.to_string()))
    }

    async fn provider_availability(
        &self,
        provider_id: &str,
    ) -> Result<Option<ProviderAvailability>> {
        ProviderAvailability::find_by_provider_id(&self.pool, provider_id)
            .await
            .map_err(|e| CalltaskError::store("provider_availability_get", e.to_string()))
    }
}
