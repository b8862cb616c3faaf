//! Imgconv Store Library
//!
//! Ephemeral key-value storage for uploaded originals. Entries carry a
//! per-record TTL enforced by the backend; this crate provides the
//! `EphemeralStore` trait, a Redis backend, an in-memory backend, and a
//! factory for backend selection.
//!
//! # Wire record
//!
//! All backends persist the same record shape per handle:
//! `{filename, filetype, buffer}` with `buffer` base64-encoded, so a store
//! can be inspected or swapped without a data migration.

pub mod factory;
pub mod memory;
pub mod redis;
pub mod record;
pub mod traits;

// Re-export commonly used types
pub use crate::factory::create_store;
pub use crate::memory::MemoryStore;
pub use crate::redis::RedisStore;
pub use crate::traits::{EphemeralStore, StoreError, StoreResult};
