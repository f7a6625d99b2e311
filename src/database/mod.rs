//! Narrow persistence seams for the task executor.
//!
//! The executor only ever needs `get`/`upsert` on the lock and read-only
//! lookups of sessions and availability, so those are the whole trait
//! surface. Postgres implementations delegate to the model accessors;
//! integration tests substitute in-memory fakes.

pub mod directory;
pub mod lock_store;

pub use directory::{PgSessionDirectory, SessionDirectory};
pub use lock_store::{LockStore, PgLockStore};
