//! Call-task execution server.
//!
//! Wires the Postgres-backed stores and the HTTP collaborator clients into a
//! task executor and serves the delivery endpoint.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

use calltask_core::config::CalltaskConfig;
use calltask_core::database::{PgLockStore, PgSessionDirectory};
use calltask_core::execution::{CompensationTrigger, PreconditionChecker, TaskExecutor};
use calltask_core::logging::init_structured_logging;
use calltask_core::services::{
    HttpCallOrchestrator, HttpPaymentGateway, OrchestratorClientConfig, PaymentClientConfig,
};
use calltask_core::web::{build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let config = CalltaskConfig::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let locks = Arc::new(PgLockStore::new(pool.clone()));
    let directory = Arc::new(PgSessionDirectory::new(pool));

    let orchestrator = Arc::new(
        HttpCallOrchestrator::new(OrchestratorClientConfig {
            base_url: config.orchestrator_base_url.clone(),
            timeout_ms: config.orchestrator_timeout_ms,
        })
        .context("Failed to build orchestrator client")?,
    );

    let payments = Arc::new(
        HttpPaymentGateway::new(PaymentClientConfig {
            base_url: config.payments_base_url.clone(),
            timeout_ms: config.payments_timeout_ms,
        })
        .context("Failed to build payment client")?,
    );

    let executor = Arc::new(TaskExecutor::new(
        locks,
        PreconditionChecker::new(directory),
        CompensationTrigger::new(payments),
        orchestrator,
        config.lock_freshness_secs,
    ));

    let state = AppState::new(executor, config.task_auth_secret.as_str());
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    info!(bind_address = %config.bind_address, "Call-task server listening");

    axum::serve(listener, router)
        .await
        .context("Server terminated")?;

    Ok(())
}
