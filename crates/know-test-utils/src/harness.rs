// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring a [`KnowledgeAiService`] to mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use know_cache::{MemoryCacheStore, ResponseCache};
use know_core::KnowledgeEntry;
use know_router::ModelRouter;
use know_service::KnowledgeAiService;

use crate::mock_backend::MockBackend;
use crate::mock_knowledge::MockKnowledgeStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    entries: Option<Vec<KnowledgeEntry>>,
    cache_ttl: Option<Duration>,
    backend_delay: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            entries: None,
            cache_ttl: None,
            backend_delay: None,
        }
    }

    /// Set mock backend responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Replace the default two-entry knowledge fixture.
    pub fn with_entries(mut self, entries: Vec<KnowledgeEntry>) -> Self {
        self.entries = Some(entries);
        self
    }

    /// Back the service with an in-memory cache using `ttl`.
    pub fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn with_backend_delay(mut self, delay: Duration) -> Self {
        self.backend_delay = Some(delay);
        self
    }

    pub fn build(self) -> TestHarness {
        let mut backend = MockBackend::with_responses(self.responses);
        if let Some(delay) = self.backend_delay {
            backend = backend.with_delay(delay);
        }
        let knowledge = match self.entries {
            Some(entries) => MockKnowledgeStore::with_entries(entries),
            None => MockKnowledgeStore::sample(),
        };
        let cache_store = Arc::new(MemoryCacheStore::new());
        let cache = match self.cache_ttl {
            Some(ttl) => ResponseCache::new(cache_store.clone(), ttl),
            None => ResponseCache::disabled(),
        };
        let router = Arc::new(ModelRouter::new());

        let service = KnowledgeAiService::new(
            Arc::new(backend.clone()),
            router,
            Arc::new(knowledge.clone()),
            cache,
        );

        TestHarness {
            service,
            backend,
            knowledge,
            cache_store,
        }
    }
}

/// A fully wired service plus handles on its mocks.
pub struct TestHarness {
    pub service: KnowledgeAiService,
    pub backend: MockBackend,
    pub knowledge: MockKnowledgeStore,
    /// Store behind the cache; empty unless the harness was built `with_cache`.
    pub cache_store: Arc<MemoryCacheStore>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }
}
