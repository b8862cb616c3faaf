//! Store factory - creates the configured backend.

use imgconv_core::{Config, StoreBackend};
use std::sync::Arc;

use crate::memory::MemoryStore;
use crate::redis::RedisStore;
use crate::traits::{EphemeralStore, StoreResult};

/// Build the ephemeral store named by the configuration.
pub fn create_store(config: &Config) -> StoreResult<Arc<dyn EphemeralStore>> {
    match config.store_backend() {
        StoreBackend::Redis => {
            tracing::info!(url = %config.redis_url(), "Using Redis ephemeral store");
            Ok(Arc::new(RedisStore::new(config.redis_url())?))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory ephemeral store; uploads do not survive restarts");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
