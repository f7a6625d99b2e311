pub mod call_tasks;
pub mod health;

pub use call_tasks::execute_call_task;
pub use health::health;
