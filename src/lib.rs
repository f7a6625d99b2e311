#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Calltask Core
//!
//! Rust core for executing scheduled outbound-call tasks delivered by an
//! at-least-once queue. This is an idempotency-plus-compensation engine: it
//! deduplicates redeliveries through a persisted execution lock,
//! re-validates provider availability immediately before dialing, invokes an
//! external call orchestrator, and on terminal precondition failure cancels
//! the payment authorization held for the session.
//!
//! ## Guarantees
//!
//! - **Best-effort exactly-once**: an `executing`/`completed` lock touched
//!   within the freshness window short-circuits a redelivery with one cheap
//!   read. The read-then-write gate is not atomic; deliveries racing inside
//!   the window can both proceed (documented limitation, the orchestrator is
//!   assumed idempotent).
//! - **Deliberate status codes**: every path yields an explicit response.
//!   Only transient (infrastructure-class) failures return 500, which is the
//!   sole signal that makes the delivery system redeliver.
//! - **Compensation never crashes the response**: a failed payment
//!   cancellation is logged and reported as `paymentCancelled:false`.
//!
//! ## Module organization
//!
//! - [`models`] - Data layer: call sessions, provider availability, locks
//! - [`database`] - Narrow persistence traits + Postgres implementations
//! - [`services`] - External collaborators: call orchestrator, payments
//! - [`execution`] - Classifier, preconditions, compensation, task executor
//! - [`web`] - Axum surface: auth middleware, delivery handler, responses
//! - [`config`] - Environment-based configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured tracing setup and fire-and-forget helpers

pub mod config;
pub mod database;
pub mod error;
pub mod execution;
pub mod logging;
pub mod models;
pub mod services;
pub mod web;

pub use config::CalltaskConfig;
pub use database::{LockStore, PgLockStore, PgSessionDirectory, SessionDirectory};
pub use error::{CalltaskError, Result};
pub use execution::{
    classify_failure, CompensationTrigger, ExecutionOutcome, FailureClass, PreconditionChecker,
    PreconditionVerdict, TaskExecutor,
};
pub use models::{CallSession, ExecutionLock, LockPatch, LockStatus, ProviderAvailability};
pub use services::{CallOrchestrator, DialResult, OrchestratorFailure, PaymentGateway};
