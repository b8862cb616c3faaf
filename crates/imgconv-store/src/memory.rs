//! In-memory ephemeral store.
//!
//! Single-process backend with the same observable semantics as Redis
//! expiry: an entry past its deadline is gone, whether or not it has been
//! physically removed yet. Used by tests and by deployments without a
//! Redis instance.

use async_trait::async_trait;
use imgconv_core::StoredOriginal;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::record::StoredRecord;
use crate::traits::{EphemeralStore, StoreError, StoreResult};

struct Entry {
    record: String,
    deadline: Instant,
}

#[derive(Default)]
pub struct MemoryStore {
    // Entries hold the JSON wire record, not the decoded original, so this
    // backend exercises the same serialization path as Redis.
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries. Called opportunistically on writes; reads
    /// treat expired entries as absent regardless.
    fn sweep(entries: &mut HashMap<String, Entry>, now: Instant) {
        entries.retain(|_, entry| entry.deadline > now);
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("store lock poisoned: {}", e)))
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .values()
                    .filter(|entry| entry.deadline > now)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EphemeralStore for MemoryStore {
    async fn put(
        &self,
        handle: &str,
        original: &StoredOriginal,
        ttl: Duration,
    ) -> StoreResult<()> {
        let record = StoredRecord::from_original(original).to_json()?;
        let now = Instant::now();
        let mut entries = self.lock()?;
        Self::sweep(&mut entries, now);
        entries.insert(
            handle.to_string(),
            Entry {
                record,
                deadline: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, handle: &str) -> StoreResult<StoredOriginal> {
        let now = Instant::now();
        let entries = self.lock()?;
        let entry = entries
            .get(handle)
            .filter(|entry| entry.deadline > now)
            .ok_or_else(|| StoreError::NotFound(handle.to_string()))?;
        StoredRecord::from_json(handle, &entry.record)?.into_original(handle)
    }

    async fn exists(&self, handle: &str) -> StoreResult<bool> {
        let now = Instant::now();
        let entries = self.lock()?;
        Ok(entries
            .get(handle)
            .map(|entry| entry.deadline > now)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn original() -> StoredOriginal {
        StoredOriginal {
            filename: "cat".into(),
            filetype: "image/png".into(),
            payload: vec![1, 2, 3, 4],
        }
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("h1", &original(), Duration::from_secs(180))
            .await
            .unwrap();
        assert!(store.exists("h1").await.unwrap());
        assert_eq!(store.get("h1").await.unwrap(), original());
    }

    #[tokio::test]
    async fn test_reads_do_not_consume() {
        let store = MemoryStore::new();
        store
            .put("h1", &original(), Duration::from_secs(180))
            .await
            .unwrap();
        for _ in 0..3 {
            assert_eq!(store.get("h1").await.unwrap(), original());
        }
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_found() {
        let store = MemoryStore::new();
        store
            .put("h1", &original(), Duration::ZERO)
            .await
            .unwrap();
        assert!(!store.exists("h1").await.unwrap());
        assert!(matches!(
            store.get("h1").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_handle_is_not_found() {
        let store = MemoryStore::new();
        assert!(!store.exists("missing").await.unwrap());
        assert!(matches!(
            store.get("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_len_counts_only_live_entries() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store
            .put("live", &original(), Duration::from_secs(180))
            .await
            .unwrap();
        store
            .put("dead", &original(), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store
            .put("h1", &original(), Duration::from_secs(180))
            .await
            .unwrap();
        let replacement = StoredOriginal {
            filename: "dog".into(),
            filetype: "image/jpeg".into(),
            payload: vec![9, 9],
        };
        store
            .put("h1", &replacement, Duration::from_secs(180))
            .await
            .unwrap();
        assert_eq!(store.get("h1").await.unwrap(), replacement);
    }
}
