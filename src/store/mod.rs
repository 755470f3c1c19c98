// SPDX-License-Identifier: MIT

//! Durable local key-value store.
//!
//! Holds the session credentials and the running-timer snapshot. Both are
//! caches: the server remains authoritative and a fresh process reconciles
//! against it at startup. The store is shared mutable state across any
//! processes pointed at the same state directory; there is no cross-process
//! locking, matching the browser-storage semantics it replaces.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Well-known store keys.
pub mod keys {
    /// Access token (short-lived bearer credential).
    pub const AUTH_TOKEN: &str = "auth_token";
    /// Refresh token (longer-lived credential).
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Serialized snapshot of the last-known running entry.
    pub const RUNNING_TIMER: &str = "running_timer";
}

/// String key-value store with durable semantics.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
