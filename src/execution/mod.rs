//! # Call-Task Execution Core
//!
//! The idempotency-plus-compensation engine behind the task endpoint:
//!
//! ```text
//! delivery system ──▶ TaskExecutor ──▶ [lock gate] ──▶ [preconditions]
//!                          │                                 │
//!                          ▼                                 ▼
//!                   CallOrchestrator            CompensationTrigger (abort)
//!                          │
//!            success ──▶ lock "completed"
//!            failure ──▶ ErrorClassifier ──▶ retry (500) | terminal (200)
//! ```

pub mod compensation;
pub mod error_classifier;
pub mod preconditions;
pub mod task_executor;

pub use compensation::CompensationTrigger;
pub use error_classifier::{classify_failure, FailureClass};
pub use preconditions::{PreconditionChecker, PreconditionVerdict};
pub use task_executor::{ExecutionOutcome, TaskExecutor};
