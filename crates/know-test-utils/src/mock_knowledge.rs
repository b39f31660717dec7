// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock knowledge store with fixed entries and a failure switch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use know_core::{
    Adapter, AdapterType, HealthStatus, KnowError, KnowledgeContext, KnowledgeEntry,
    KnowledgeStore, NewEntry, StoreOutcome,
};

/// A knowledge store that answers every search with the same entries.
///
/// In failure mode `search` returns an empty context and `store` reports an
/// unsuccessful outcome, matching how the real client degrades.
#[derive(Clone, Default)]
pub struct MockKnowledgeStore {
    entries: Arc<Vec<KnowledgeEntry>>,
    failing: Arc<AtomicBool>,
    searches: Arc<AtomicUsize>,
    last_limit: Arc<Mutex<Option<usize>>>,
    stored: Arc<Mutex<Vec<NewEntry>>>,
}

impl MockKnowledgeStore {
    /// A store with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
            ..Self::default()
        }
    }

    /// The two-entry fixture used across the service tests.
    pub fn sample() -> Self {
        Self::with_entries(vec![
            KnowledgeEntry::new(
                "Laravel Queues",
                "Use dispatch() to push jobs onto the queue.",
                vec!["laravel".into(), "queues".into()],
            ),
            KnowledgeEntry::new(
                "Redis Config",
                "Set REDIS_HOST in .env",
                vec!["redis".into(), "config".into()],
            ),
        ])
    }

    /// Toggle failure mode.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub async fn last_limit(&self) -> Option<usize> {
        *self.last_limit.lock().await
    }

    pub async fn stored(&self) -> Vec<NewEntry> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl Adapter for MockKnowledgeStore {
    fn name(&self) -> &str {
        "mock-knowledge"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Knowledge
    }

    async fn health_check(&self) -> Result<HealthStatus, KnowError> {
        if self.failing.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("mock knowledge store down".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl KnowledgeStore for MockKnowledgeStore {
    async fn search(&self, _query: &str, limit: usize) -> KnowledgeContext {
        self.searches.fetch_add(1, Ordering::SeqCst);
        *self.last_limit.lock().await = Some(limit);

        if self.failing.load(Ordering::SeqCst) {
            return KnowledgeContext::empty();
        }
        KnowledgeContext::from_entries(self.entries.iter().take(limit).cloned().collect())
    }

    async fn store(&self, entry: &NewEntry) -> StoreOutcome {
        if self.failing.load(Ordering::SeqCst) {
            return StoreOutcome::failed("mock knowledge store down");
        }

        let mut stored = self.stored.lock().await;
        stored.push(entry.clone());
        let id = format!("mock-{}", stored.len());
        StoreOutcome {
            success: true,
            raw: json!({"success": true, "id": id}),
            id: Some(id),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_respects_limit_and_counts() {
        let store = MockKnowledgeStore::sample();
        assert_eq!(store.search("q", 1).await.len(), 1);
        assert_eq!(store.search("q", 10).await.len(), 2);
        assert_eq!(store.search_count(), 2);
        assert_eq!(store.last_limit().await, Some(10));
    }

    #[tokio::test]
    async fn failure_mode_degrades() {
        let store = MockKnowledgeStore::sample();
        store.set_failing(true);
        assert!(store.search("q", 10).await.is_empty());
        assert!(!store.is_available().await);

        let outcome = store
            .store(&NewEntry {
                title: "t".into(),
                content: "c".into(),
                tags: vec![],
            })
            .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn store_records_entries() {
        let store = MockKnowledgeStore::empty();
        let outcome = store
            .store(&NewEntry {
                title: "t".into(),
                content: "c".into(),
                tags: vec!["x".into()],
            })
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.id.as_deref(), Some("mock-1"));
        assert_eq!(store.stored().await.len(), 1);
    }
}
