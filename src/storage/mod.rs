//! Key-value persistence behind the ledger.
//!
//! The ledger only ever reads and writes whole string values by key. Any
//! backend providing that can hold a ledger: [`MemoryStore`] for tests and
//! throwaway sessions, [`SqliteStore`] for durable use.

use crate::errors::Result;
use std::future::Future;

/// In-memory backend
pub mod memory;
/// SeaORM/SQLite backend
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Get/set-by-key access to string values.
///
/// `set` overwrites unconditionally; there is no versioning, so concurrent
/// writers to the same key are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}
