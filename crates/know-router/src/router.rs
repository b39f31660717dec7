// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model routing with explicit overrides and runtime route changes.
//!
//! Resolution order: explicit model string > classified intent > `default`.

use std::sync::RwLock;

use know_config::model::RoutingConfig;
use know_core::{KnowError, Route, RouteTemplate, Tier};
use tracing::{debug, info, warn};

use crate::classifier::{DEFAULT_INTENT, EXPLICIT_INTENT, IntentClassifier};

/// Model-name shortcuts accepted as explicit overrides.
const SHORTCUTS: &[(&str, &str, &str, Tier)] = &[
    ("claude", "anthropic", "claude-sonnet-4-5-20250929", Tier::Premium),
    ("opus", "anthropic", "claude-opus-4-6", Tier::Premium),
    ("grok", "xai", "grok-3", Tier::Balanced),
    ("llama", "groq", "llama-3.3-70b-versatile", Tier::Fast),
    ("gemini", "openrouter", "google/gemini-2.5-pro", Tier::Balanced),
];

/// Built-in route table, in iteration order.
const DEFAULT_ROUTES: &[(&str, &str, &str, Tier)] = &[
    ("what", "groq", "llama-3.3-70b-versatile", Tier::Fast),
    ("how", "xai", "grok-3", Tier::Balanced),
    ("why", "anthropic", "claude-sonnet-4-5-20250929", Tier::Premium),
    ("analyze", "anthropic", "claude-opus-4-6", Tier::Premium),
    ("code", "openrouter", "google/gemini-2.5-pro", Tier::Balanced),
    ("search", "groq", "llama-3.3-70b-versatile", Tier::Fast),
    (DEFAULT_INTENT, "xai", "grok-3", Tier::Balanced),
];

/// Provider used for bare explicit ids when none is configured.
pub const FALLBACK_PROVIDER: &str = "openrouter";

/// Look up a model shortcut such as `grok` or `opus`.
pub fn shortcut(name: &str) -> Option<RouteTemplate> {
    SHORTCUTS
        .iter()
        .find(|(label, ..)| *label == name)
        .map(|(_, provider, model, tier)| RouteTemplate::new(*provider, *model, *tier))
}

/// Names of all model shortcuts, in table order.
pub fn shortcut_names() -> impl Iterator<Item = &'static str> {
    SHORTCUTS.iter().map(|(label, ..)| *label)
}

/// Parse an explicit model string into a route template.
///
/// Accepts a shortcut (`grok`), a `provider/model` pair split on the first
/// `/` (`openrouter/meta/llama-4`), or a bare model id that is sent to
/// `fallback_provider`. A pair with an empty half is treated as a bare id.
pub fn parse_explicit_model(model: &str, fallback_provider: &str) -> RouteTemplate {
    if let Some(template) = shortcut(model) {
        return template;
    }

    if let Some((provider, id)) = model.split_once('/') {
        if !provider.is_empty() && !id.is_empty() {
            return RouteTemplate::new(provider, id, Tier::Custom);
        }
        debug!(model, "explicit model has an empty provider or id half, treating as bare id");
    }

    RouteTemplate::new(fallback_provider, model, Tier::Custom)
}

/// Owns the intent route table and resolves queries to concrete routes.
///
/// Shared across concurrent requests behind an `Arc`; the table sits behind a
/// reader-writer lock so lookups never block each other.
#[derive(Debug)]
pub struct ModelRouter {
    classifier: IntentClassifier,
    routes: RwLock<Vec<(String, RouteTemplate)>>,
    fallback_provider: String,
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRouter {
    /// Router with the built-in route table and the `openrouter` fallback.
    pub fn new() -> Self {
        let routes = DEFAULT_ROUTES
            .iter()
            .map(|(intent, provider, model, tier)| {
                (
                    (*intent).to_string(),
                    RouteTemplate::new(*provider, *model, *tier),
                )
            })
            .collect();
        Self {
            classifier: IntentClassifier::new(),
            routes: RwLock::new(routes),
            fallback_provider: FALLBACK_PROVIDER.to_string(),
        }
    }

    /// Router built from `[routing]` config: fallback provider plus route overrides.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, KnowError> {
        let mut router = Self::new();
        router.fallback_provider = config.fallback_provider.clone();
        for (intent, route) in &config.routes {
            router.set_route(intent, &route.provider, &route.model, route.tier)?;
        }
        Ok(router)
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn fallback_provider(&self) -> &str {
        &self.fallback_provider
    }

    /// Resolve a query to a route. A non-empty `explicit_model` always wins
    /// and skips classification.
    pub fn resolve(&self, query: &str, explicit_model: Option<&str>) -> Route {
        if let Some(model) = explicit_model.map(str::trim).filter(|m| !m.is_empty()) {
            let route = parse_explicit_model(model, &self.fallback_provider)
                .with_intent(EXPLICIT_INTENT);
            debug!(
                provider = route.provider.as_str(),
                model = route.model.as_str(),
                "explicit model override"
            );
            return route;
        }

        let intent = self.classifier.classify(query);
        let routes = self.routes.read().unwrap_or_else(|e| e.into_inner());
        let template = lookup(&routes, intent).or_else(|| lookup(&routes, DEFAULT_INTENT));

        let route = match template {
            Some(template) => template.with_intent(intent),
            None => {
                // Only reachable if `default` was never present; keep dispatching.
                warn!(intent, "route table has no default entry, using built-in default");
                RouteTemplate::new("xai", "grok-3", Tier::Balanced).with_intent(intent)
            }
        };
        debug!(
            intent,
            provider = route.provider.as_str(),
            model = route.model.as_str(),
            tier = %route.tier,
            "routed query"
        );
        route
    }

    /// Insert or overwrite the route for `intent`. Overwrites keep their
    /// position in the table; new intents are appended.
    pub fn set_route(
        &self,
        intent: &str,
        provider: &str,
        model: &str,
        tier: Tier,
    ) -> Result<(), KnowError> {
        if intent.trim().is_empty() {
            return Err(KnowError::Config("route intent must not be empty".into()));
        }
        if provider.trim().is_empty() || model.trim().is_empty() {
            return Err(KnowError::Config(format!(
                "route for `{intent}` needs a non-empty provider and model"
            )));
        }

        let template = RouteTemplate::new(provider, model, tier);
        let mut routes = self.routes.write().unwrap_or_else(|e| e.into_inner());
        match routes.iter_mut().find(|(name, _)| name == intent) {
            Some((_, existing)) => *existing = template,
            None => routes.push((intent.to_string(), template)),
        }
        info!(intent, provider, model, %tier, "route override applied");
        Ok(())
    }

    /// Snapshot of the route table in iteration order.
    pub fn routes(&self) -> Vec<(String, RouteTemplate)> {
        self.routes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The template for one intent, if present.
    pub fn route_for(&self, intent: &str) -> Option<RouteTemplate> {
        let routes = self.routes.read().unwrap_or_else(|e| e.into_inner());
        lookup(&routes, intent).cloned()
    }
}

fn lookup<'a>(routes: &'a [(String, RouteTemplate)], intent: &str) -> Option<&'a RouteTemplate> {
    routes
        .iter()
        .find(|(name, _)| name == intent)
        .map(|(_, template)| template)
}
