// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-result cache keyed by `(query, model id)`.
//!
//! The key ignores provider and intent: the same model id answers the same
//! question identically whichever route selected it. Store failures never
//! surface; they are logged and treated as misses.

use std::sync::Arc;
use std::time::Duration;

use know_config::model::CacheConfig;
use know_core::{CacheStore, QueryResult};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::store::{NoopCacheStore, store_from_config};

/// Prefix shared by every cache key.
pub const KEY_PREFIX: &str = "knowledge:";

/// Deterministic cache key for a query and resolved model id.
///
/// Both parts are length-prefixed before hashing so that `("ab", "c")` and
/// `("a", "bc")` never collide.
pub fn cache_key(query: &str, model_id: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [query, model_id] {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{KEY_PREFIX}{}", hex::encode(hasher.finalize()))
}

/// Caches [`QueryResult`]s as JSON blobs in a [`CacheStore`].
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    enabled: bool,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl ResponseCache {
    /// An enabled cache over `store` with the given TTL.
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            enabled: true,
        }
    }

    /// A cache that never stores or returns anything.
    pub fn disabled() -> Self {
        Self {
            store: Arc::new(NoopCacheStore),
            ttl: Duration::ZERO,
            enabled: false,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self::new(store_from_config(config), Duration::from_secs(config.ttl))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached result for the pair, or `None` on miss, decode failure or store error.
    pub async fn get(&self, query: &str, model_id: &str) -> Option<QueryResult> {
        if !self.enabled {
            return None;
        }
        let key = cache_key(query, model_id);
        let blob = match self.store.get(&key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(model = model_id, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "cache unavailable, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice::<QueryResult>(&blob) {
            Ok(result) => {
                debug!(model = model_id, "cache hit");
                Some(result)
            }
            Err(e) => {
                warn!(error = %e, "undecodable cache entry, treating as miss");
                None
            }
        }
    }

    /// Store `result` under the pair. Failures are logged and swallowed.
    pub async fn put(&self, query: &str, model_id: &str, result: &QueryResult) {
        if !self.enabled {
            return;
        }
        let blob = match serde_json::to_vec(result) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to encode query result for cache");
                return;
            }
        };
        if let Err(e) = self
            .store
            .put(&cache_key(query, model_id), blob, self.ttl)
            .await
        {
            warn!(error = %e, "cache write failed");
        }
    }

    /// Remove one entry. `false` when disabled, absent, or the store failed.
    pub async fn forget(&self, query: &str, model_id: &str) -> bool {
        if !self.enabled {
            return false;
        }
        self.store
            .forget(&cache_key(query, model_id))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "cache forget failed");
                false
            })
    }

    /// Remove every entry. `false` when disabled or the store failed.
    pub async fn flush(&self) -> bool {
        if !self.enabled {
            return false;
        }
        self.store.flush().await.unwrap_or_else(|e| {
            warn!(error = %e, "cache flush failed");
            false
        })
    }
}
