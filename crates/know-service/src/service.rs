// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The query orchestrator.
//!
//! [`KnowledgeAiService`] ties routing, caching, knowledge retrieval and
//! prompt construction together in front of a single [`AiBackend`].

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use know_cache::ResponseCache;
use know_config::model::KnowConfig;
use know_context::PromptBuilder;
use know_core::{
    AiBackend, ConsensusResult, KnowError, KnowledgeStore, ModelOutcome, ModelResponse,
    QueryResult,
};
use know_router::ModelRouter;
use tracing::{debug, info, warn};

/// Labels consulted by [`KnowledgeAiService::consensus`] when none are given.
pub const DEFAULT_CONSENSUS_MODELS: [&str; 3] = ["claude", "grok", "gemini"];

/// Entries fetched per query when the caller does not say otherwise.
pub const DEFAULT_CONTEXT_LIMIT: usize = 10;

/// Knowledge-augmented query service.
pub struct KnowledgeAiService {
    backend: Arc<dyn AiBackend>,
    router: Arc<ModelRouter>,
    knowledge: Arc<dyn KnowledgeStore>,
    cache: ResponseCache,
    prompts: PromptBuilder,
    consensus_models: Vec<String>,
    context_limit: usize,
}

impl KnowledgeAiService {
    pub fn new(
        backend: Arc<dyn AiBackend>,
        router: Arc<ModelRouter>,
        knowledge: Arc<dyn KnowledgeStore>,
        cache: ResponseCache,
    ) -> Self {
        Self {
            backend,
            router,
            knowledge,
            cache,
            prompts: PromptBuilder::new(),
            consensus_models: DEFAULT_CONSENSUS_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            context_limit: DEFAULT_CONTEXT_LIMIT,
        }
    }

    /// Assemble a service from loaded configuration around the given collaborators.
    pub fn from_config(
        config: &KnowConfig,
        backend: Arc<dyn AiBackend>,
        knowledge: Arc<dyn KnowledgeStore>,
    ) -> Result<Self, KnowError> {
        let router = Arc::new(ModelRouter::from_config(&config.routing)?);
        let cache = ResponseCache::from_config(&config.cache);
        Ok(Self::new(backend, router, knowledge, cache)
            .with_consensus_models(config.routing.consensus_models.clone())
            .with_context_limit(config.context.limit))
    }

    /// Replace the default consensus set. An empty list keeps the current one.
    pub fn with_consensus_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.consensus_models = models;
        }
        self
    }

    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = limit.max(1);
        self
    }

    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn context_limit(&self) -> usize {
        self.context_limit
    }

    pub fn consensus_models(&self) -> &[String] {
        &self.consensus_models
    }

    /// Answer `query` grounded in up to `context_limit` knowledge entries.
    ///
    /// A cache hit is returned unchanged without touching the knowledge store
    /// or the backend. Backend failures propagate; nothing is cached for them.
    pub async fn query(
        &self,
        query: &str,
        explicit_model: Option<&str>,
        context_limit: usize,
    ) -> Result<QueryResult, KnowError> {
        let route = self.router.resolve(query, explicit_model);

        if let Some(cached) = self.cache.get(query, &route.model).await {
            debug!(model = route.model.as_str(), "answered from cache");
            return Ok(cached);
        }

        let context = self.knowledge.search(query, context_limit).await;
        let prompt = self.prompts.build(query, &context);
        debug!(
            entries = context.len(),
            prompt_len = prompt.len(),
            "prompt assembled"
        );

        let response = self
            .backend
            .invoke(&prompt, &route.provider, &route.model)
            .await?;

        let result = QueryResult {
            query: query.to_string(),
            response,
            model: route,
            context_entries: context.len(),
        };
        self.cache.put(query, &result.model.model, &result).await;
        Ok(result)
    }

    /// Send `query` to the routed model as-is, without knowledge or caching.
    pub async fn query_direct(
        &self,
        query: &str,
        explicit_model: Option<&str>,
    ) -> Result<QueryResult, KnowError> {
        let route = self.router.resolve(query, explicit_model);
        let response = self
            .backend
            .invoke(query, &route.provider, &route.model)
            .await?;

        Ok(QueryResult {
            query: query.to_string(),
            response,
            model: route,
            context_entries: 0,
        })
    }

    /// Ask several models the same knowledge-grounded question concurrently.
    ///
    /// Each label is resolved as an explicit model. Per-model failures are
    /// recorded in that label's slot; the call itself never fails. Duplicate
    /// labels are consulted once, at their first position.
    pub async fn consensus(&self, query: &str, labels: &[String]) -> ConsensusResult {
        let labels = dedupe(if labels.is_empty() {
            self.consensus_models.as_slice()
        } else {
            labels
        });

        let context = self.knowledge.search(query, self.context_limit).await;
        let prompt = self.prompts.build(query, &context);

        let calls = labels.iter().map(|label| {
            let route = self.router.resolve(query, Some(label.as_str()));
            let prompt = prompt.as_str();
            async move {
                let outcome = match self
                    .backend
                    .invoke(prompt, &route.provider, &route.model)
                    .await
                {
                    Ok(response) => ModelOutcome::Success { response },
                    Err(e) => {
                        warn!(
                            label = label.as_str(),
                            provider = route.provider.as_str(),
                            model = route.model.as_str(),
                            error = %e,
                            "consensus model failed"
                        );
                        ModelOutcome::Failure {
                            error: e.to_string(),
                        }
                    }
                };
                (
                    label.clone(),
                    ModelResponse {
                        model: route,
                        outcome,
                    },
                )
            }
        });
        let responses = join_all(calls).await;

        let failures = responses.iter().filter(|(_, r)| !r.is_success()).count();
        info!(
            consulted = responses.len(),
            failures,
            entries = context.len(),
            "consensus complete"
        );

        ConsensusResult {
            query: query.to_string(),
            models_consulted: responses.len(),
            responses,
            context_entries: context.len(),
        }
    }
}

fn dedupe(labels: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .filter(|label| seen.insert(label.as_str()))
        .cloned()
        .collect()
}
