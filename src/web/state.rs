//! Shared application state for the web surface.

use std::sync::Arc;

use crate::execution::TaskExecutor;

/// State shared across request handlers.
///
/// Handlers are stateless beyond this: each delivery is an independent
/// invocation and the persisted lock is the only cross-request state.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<TaskExecutor>,
    pub task_auth_secret: Arc<str>,
}

impl AppState {
    pub fn new(executor: Arc<TaskExecutor>, task_auth_secret: impl Into<Arc<str>>) -> Self {
        Self {
            executor,
            task_auth_secret: task_auth_secret.into(),
        }
    }
}
