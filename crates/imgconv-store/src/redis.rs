//! Redis-backed ephemeral store.
//!
//! TTL enforcement is Redis's own (`SET ... EX`). Connections are scoped
//! per operation; no pooled connection is held between requests.

use async_trait::async_trait;
use imgconv_core::StoredOriginal;
use redis::AsyncCommands;
use std::time::Duration;

use crate::record::StoredRecord;
use crate::traits::{EphemeralStore, StoreError, StoreResult};

#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Validate the URL and build a client. No connection is made here;
    /// each operation connects on demand.
    pub fn new(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::Unavailable(format!("invalid Redis URL: {}", e)))?;
        Ok(RedisStore { client })
    }

    async fn connection(&self) -> StoreResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn put(
        &self,
        handle: &str,
        original: &StoredOriginal,
        ttl: Duration,
    ) -> StoreResult<()> {
        let json = StoredRecord::from_original(original).to_json()?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(handle, json, ttl.as_secs())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        tracing::debug!(handle = %handle, ttl_secs = ttl.as_secs(), "Stored original");
        Ok(())
    }

    async fn get(&self, handle: &str) -> StoreResult<StoredOriginal> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn
            .get(handle)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let raw = raw.ok_or_else(|| StoreError::NotFound(handle.to_string()))?;
        StoredRecord::from_json(handle, &raw)?.into_original(handle)
    }

    async fn exists(&self, handle: &str) -> StoreResult<bool> {
        let mut conn = self.connection().await?;
        conn.exists(handle)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
