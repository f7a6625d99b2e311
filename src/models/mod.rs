//! Data layer for the call-task execution core.
//!
//! The core reads [`CallSession`] and [`ProviderAvailability`] and owns writes
//! to [`ExecutionLock`]. Session and availability rows belong to the booking
//! subsystem; this crate never mutates them.

pub mod call_session;
pub mod execution_lock;

pub use call_session::{CallSession, ProviderAvailability};
pub use execution_lock::{ExecutionLock, LockPatch, LockStatus};
