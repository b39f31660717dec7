// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, cache, context builder and service.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

/// Informational quality/cost bucket for a route.
///
/// Tiers are used for display and filtering only; dispatch never depends on them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tier {
    Fast,
    Balanced,
    Premium,
    Custom,
}

/// A route-table entry before an intent is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTemplate {
    pub provider: String,
    pub model: String,
    pub tier: Tier,
}

impl RouteTemplate {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, tier: Tier) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            tier,
        }
    }

    /// Attach the intent that selected this template.
    pub fn with_intent(&self, intent: impl Into<String>) -> Route {
        Route {
            provider: self.provider.clone(),
            model: self.model.clone(),
            tier: self.tier,
            intent: intent.into(),
        }
    }
}

/// A fully resolved dispatch target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub provider: String,
    pub model: String,
    pub tier: Tier,
    pub intent: String,
}

/// A record returned by the knowledge store.
///
/// The store is loose about field presence: titles may be missing and older
/// entries carry their text under `body` rather than `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl KnowledgeEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            body: None,
            tags,
        }
    }

    /// Title for display, `Untitled` when absent.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Entry text: `content`, else `body`, else empty.
    pub fn text(&self) -> &str {
        self.content
            .as_deref()
            .or(self.body.as_deref())
            .unwrap_or("")
    }
}

/// Ordered knowledge entries retrieved for a query. Ranking is the store's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeContext {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: Vec<KnowledgeEntry>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl KnowledgeContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        let total = Some(entries.len() as u64);
        Self { entries, total }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A new entry submitted to the knowledge store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Outcome of storing a knowledge entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreOutcome {
    pub success: bool,
    /// Identifier the store assigned to the new entry, when it reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response body as returned by the store.
    pub raw: serde_json::Value,
}

impl StoreOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            id: None,
            raw: serde_json::json!({"success": false, "error": error}),
            error: Some(error),
        }
    }
}

/// Payload returned by the AI backend.
///
/// The core treats this as opaque; `text` is the only field it relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    /// Concatenated text content of the answer.
    pub text: String,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub tokens: Option<serde_json::Value>,
    #[serde(default)]
    pub cost: Option<f64>,
    /// Full backend body for callers that want the metadata.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl BackendResponse {
    /// A response carrying only text (mocks, tests).
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message_id: None,
            tokens: None,
            cost: None,
            raw: serde_json::Value::Null,
        }
    }

    /// Text to show a user; falls back to the raw JSON when no text part exists.
    pub fn display_text(&self) -> String {
        if self.text.is_empty() {
            self.raw.to_string()
        } else {
            self.text.clone()
        }
    }
}

/// Result of a single routed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub response: BackendResponse,
    pub model: Route,
    pub context_entries: usize,
}

/// Per-model outcome inside a consensus run. Exactly one variant per slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelOutcome {
    Success { response: BackendResponse },
    Failure { error: String },
}

/// One model's slot in a consensus result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResponse {
    pub model: Route,
    #[serde(flatten)]
    pub outcome: ModelOutcome,
}

impl ModelResponse {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ModelOutcome::Success { .. })
    }

    pub fn response(&self) -> Option<&BackendResponse> {
        match &self.outcome {
            ModelOutcome::Success { response } => Some(response),
            ModelOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ModelOutcome::Success { .. } => None,
            ModelOutcome::Failure { error } => Some(error),
        }
    }
}

/// Result of asking several models the same enriched question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusResult {
    pub query: String,
    /// Slots in the caller's label order; serialized as an ordered JSON object.
    #[serde(serialize_with = "serialize_ordered")]
    pub responses: Vec<(String, ModelResponse)>,
    pub models_consulted: usize,
    pub context_entries: usize,
}

impl ConsensusResult {
    /// Look up a slot by the label the caller requested.
    pub fn get(&self, label: &str) -> Option<&ModelResponse> {
        self.responses
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, r)| r)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.responses.iter().map(|(l, _)| l.as_str())
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Backend,
    Knowledge,
    Cache,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn serialize_ordered<S>(entries: &[(String, ModelResponse)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (label, response) in entries {
        map.serialize_entry(label, response)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn route() -> Route {
        RouteTemplate::new("xai", "grok-3", Tier::Balanced).with_intent("how")
    }

    #[test]
    fn tier_display_and_parse() {
        assert_eq!(Tier::Premium.to_string(), "premium");
        assert_eq!(Tier::from_str("fast").unwrap(), Tier::Fast);
        assert_eq!(Tier::from_str("Custom").unwrap(), Tier::Custom);
        assert!(Tier::from_str("gold").is_err());
    }

    #[test]
    fn entry_falls_back_to_body_then_empty() {
        let json = r#"{"title": null, "body": "legacy text", "tags": null}"#;
        let entry: KnowledgeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.display_title(), "Untitled");
        assert_eq!(entry.text(), "legacy text");
        assert!(entry.tags.is_empty());

        let bare: KnowledgeEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.text(), "");
    }

    #[test]
    fn context_tolerates_missing_entries() {
        let ctx: KnowledgeContext = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(ctx.is_empty());
    }

    #[test]
    fn model_response_serializes_exactly_one_variant() {
        let ok = ModelResponse {
            model: route(),
            outcome: ModelOutcome::Success {
                response: BackendResponse::text_only("hi"),
            },
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("response").is_some());
        assert!(json.get("error").is_none());

        let failed = ModelResponse {
            model: route(),
            outcome: ModelOutcome::Failure {
                error: "boom".into(),
            },
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], "boom");
        assert!(json.get("response").is_none());
        assert_eq!(json["model"]["provider"], "xai");
    }

    #[test]
    fn consensus_serializes_in_label_order() {
        let slot = |text: &str| ModelResponse {
            model: route(),
            outcome: ModelOutcome::Success {
                response: BackendResponse::text_only(text),
            },
        };
        let result = ConsensusResult {
            query: "q".into(),
            responses: vec![
                ("zeta".into(), slot("z")),
                ("alpha".into(), slot("a")),
            ],
            models_consulted: 2,
            context_entries: 0,
        };
        let json = serde_json::to_string(&result).unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);
        assert!(result.get("alpha").unwrap().is_success());
        assert!(result.get("missing").is_none());
    }

    #[test]
    fn display_text_falls_back_to_raw() {
        let resp = BackendResponse {
            text: String::new(),
            message_id: None,
            tokens: None,
            cost: None,
            raw: serde_json::json!({"parts": []}),
        };
        assert_eq!(resp.display_text(), r#"{"parts":[]}"#);
    }
}
