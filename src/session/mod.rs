//! Ownership of the mutable build environment during a session

pub mod lock;
pub mod snapshot;

pub use lock::{SessionLock, SessionLockGuard};
pub use snapshot::{EnvironmentGuard, EnvironmentSnapshot};
