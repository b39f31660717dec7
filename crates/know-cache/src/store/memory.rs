// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local cache store backed by a concurrent map.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use know_core::{CacheStore, KnowError};

/// Upper bound on entry lifetime so `Instant` arithmetic cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct Slot {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-memory store with per-entry expiry.
///
/// Expired entries are dropped when read, and every write sweeps out the rest.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, Slot>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KnowError> {
        let now = Instant::now();
        // Clone out before removing; holding a shard ref across remove deadlocks.
        let slot = self.entries.get(key).map(|s| s.value().clone());
        match slot {
            Some(slot) if slot.expires_at > now => Ok(Some(slot.value)),
            Some(_) => {
                self.entries.remove_if(key, |_, s| s.expires_at <= now);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), KnowError> {
        let now = Instant::now();
        self.entries.retain(|_, s| s.expires_at > now);
        if ttl.is_zero() {
            self.entries.remove(key);
            return Ok(());
        }
        let expires_at = now + ttl.min(MAX_TTL);
        self.entries
            .insert(key.to_string(), Slot { value, expires_at });
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<bool, KnowError> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn flush(&self) -> Result<bool, KnowError> {
        self.entries.clear();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn put_get_forget() {
        let store = MemoryCacheStore::new();
        store.put("k", b"v".to_vec(), HOUR).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert!(store.forget("k").await.unwrap());
        assert!(!store.forget("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_are_misses() {
        let store = MemoryCacheStore::new();
        store
            .put("k", b"v".to_vec(), Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn writes_evict_expired_entries_never_read_again() {
        let store = MemoryCacheStore::new();
        store
            .put("stale", b"v".to_vec(), Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        store.put("fresh", b"v".to_vec(), HOUR).await.unwrap();

        assert_eq!(store.entries.len(), 1);
        assert!(store.entries.contains_key("fresh"));
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let store = MemoryCacheStore::new();
        store.put("k", b"old".to_vec(), HOUR).await.unwrap();
        store.put("k", b"new".to_vec(), Duration::ZERO).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn flush_clears_everything() {
        let store = MemoryCacheStore::new();
        store.put("a", vec![1], HOUR).await.unwrap();
        store.put("b", vec![2], HOUR).await.unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.flush().await.unwrap());
        assert!(store.is_empty());
    }
}
