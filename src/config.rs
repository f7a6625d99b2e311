use crate::error::{CalltaskError, Result};

/// Runtime configuration for the call-task execution core.
///
/// Loaded from environment variables with working defaults for local
/// development. The shared task-auth secret has no default: the executor
/// endpoint refuses to start without one.
#[derive(Debug, Clone)]
pub struct CalltaskConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Shared secret the task delivery system must present in `X-Task-Auth`.
    pub task_auth_secret: String,
    /// Seconds an `executing`/`completed` lock counts as proof of a live or
    /// recent duplicate.
    pub lock_freshness_secs: u64,
    pub orchestrator_base_url: String,
    pub orchestrator_timeout_ms: u64,
    pub payments_base_url: String,
    pub payments_timeout_ms: u64,
}

impl Default for CalltaskConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/calltask_development".to_string(),
            bind_address: "0.0.0.0:8080".to_string(),
            task_auth_secret: String::new(),
            lock_freshness_secs: 600,
            orchestrator_base_url: "http://localhost:8090".to_string(),
            orchestrator_timeout_ms: 30_000,
            payments_base_url: "http://localhost:8091".to_string(),
            payments_timeout_ms: 15_000,
        }
    }
}

impl CalltaskConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(bind) = std::env::var("CALLTASK_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        config.task_auth_secret = std::env::var("CALLTASK_TASK_AUTH_SECRET").map_err(|_| {
            CalltaskError::ConfigurationError(
                "CALLTASK_TASK_AUTH_SECRET must be set".to_string(),
            )
        })?;

        if let Ok(freshness) = std::env::var("CALLTASK_LOCK_FRESHNESS_SECS") {
            config.lock_freshness_secs = freshness.parse().map_err(|e| {
                CalltaskError::ConfigurationError(format!("Invalid lock_freshness_secs: {e}"))
            })?;
        }

        if let Ok(url) = std::env::var("CALLTASK_ORCHESTRATOR_URL") {
            config.orchestrator_base_url = url;
        }

        if let Ok(timeout) = std::env::var("CALLTASK_ORCHESTRATOR_TIMEOUT_MS") {
            config.orchestrator_timeout_ms = timeout.parse().map_err(|e| {
                CalltaskError::ConfigurationError(format!("Invalid orchestrator_timeout_ms: {e}"))
            })?;
        }

        if let Ok(url) = std::env::var("CALLTASK_PAYMENTS_URL") {
            config.payments_base_url = url;
        }

        if let Ok(timeout) = std::env::var("CALLTASK_PAYMENTS_TIMEOUT_MS") {
            config.payments_timeout_ms = timeout.parse().map_err(|e| {
                CalltaskError::ConfigurationError(format!("Invalid payments_timeout_ms: {e}"))
            })?;
        }

        Ok(config)
    }
}
