pub mod auth;

pub use auth::require_task_auth;
