//! Ephemeral store abstraction trait.

use async_trait::async_trait;
use imgconv_core::StoredOriginal;
use std::time::Duration;
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The handle does not exist or its TTL has elapsed. A terminal,
    /// expected condition, not a transient fault.
    #[error("No entry for handle: {0}")]
    NotFound(String),

    /// The backend could not be reached or refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be deserialized.
    #[error("Corrupt record for handle {handle}: {message}")]
    Corrupt { handle: String, message: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Ephemeral key-value store for uploaded originals.
///
/// Semantics all backends must uphold:
/// - `put` followed by `get` for the same handle observes the record until
///   the TTL elapses; reads do not renew the TTL.
/// - `get` never mutates; concurrent reads of one handle are safe.
/// - After expiry, `get` returns `NotFound` and `exists` returns `false`.
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Write a record under `handle`, expiring after `ttl`.
    async fn put(&self, handle: &str, original: &StoredOriginal, ttl: Duration)
        -> StoreResult<()>;

    /// Read the record stored under `handle`.
    async fn get(&self, handle: &str) -> StoreResult<StoredOriginal>;

    /// Whether a live (unexpired) record exists under `handle`.
    async fn exists(&self, handle: &str) -> StoreResult<bool>;
}
