use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// A scheduled client-to-provider phone consultation.
/// Maps to the `call_sessions` table. Read-only from this crate's point of
/// view: status changes happen through the call orchestrator or the booking
/// subsystem, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CallSession {
    pub id: String,
    pub provider_id: Option<String>,
    pub status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CallSession {
    /// Find a call session by its opaque id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<CallSession>, sqlx::Error> {
        sqlx::query_as::<_, CallSession>(
            r#"
            SELECT id, provider_id, status, scheduled_at, created_at, updated_at
            FROM call_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// Live availability snapshot for a provider.
/// Maps to the `provider_availability` table. "available" is the only status
/// that permits a call attempt; anything else aborts the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProviderAvailability {
    pub provider_id: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl ProviderAvailability {
    pub async fn find_by_provider_id(
        pool: &PgPool,
        provider_id: &str,
    ) -> Result<Option<ProviderAvailability>, sqlx::Error> {
        sqlx::query_as::<_, ProviderAvailability>(
            r#"
            SELECT provider_id, status, updated_at
            FROM provider_availability
            WHERE provider_id = $1
            "#,
        )
        .bind(provider_id)
        .fetch_optional(pool)
        .await
    }

    /// The only status value that permits placing a call.
    pub fn permits_call(&self) -> bool {
        self.status == "available"
    }
}
