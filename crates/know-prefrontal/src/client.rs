// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Prefrontal knowledge API.
//!
//! Read paths never fail: transport, status and decode errors are logged and
//! replaced by an empty result so a query can still be answered without
//! grounding.

use std::time::Duration;

use know_config::model::PrefrontalConfig;
use know_core::{KnowError, KnowledgeContext, NewEntry, StoreOutcome};
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// HTTP client for a Prefrontal knowledge base.
#[derive(Debug, Clone)]
pub struct PrefrontalClient {
    client: reqwest::Client,
    base_url: String,
    probe_timeout: Duration,
}

impl PrefrontalClient {
    /// Creates a client. `token`, when present, is sent as a bearer credential.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<&str>,
        timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, KnowError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| KnowError::Config(format!("invalid prefrontal token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| KnowError::Knowledge {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            probe_timeout,
        })
    }

    pub fn from_config(config: &PrefrontalConfig) -> Result<Self, KnowError> {
        Self::new(
            config.url.as_str(),
            config.token.as_deref(),
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Up to `limit` entries matching `query` (`GET /filter`). Empty on any failure.
    pub async fn search(&self, query: &str, limit: usize) -> KnowledgeContext {
        let limit_param = limit.to_string();
        let params = [("search", query), ("limit", limit_param.as_str())];
        match self.get_json::<KnowledgeContext>("/filter", &params).await {
            Ok(mut context) => {
                context.entries.truncate(limit);
                debug!(entries = context.len(), "knowledge search complete");
                context
            }
            Err(e) => {
                warn!(error = %e, "knowledge search failed, continuing without context");
                KnowledgeContext {
                    entries: Vec::new(),
                    total: Some(0),
                }
            }
        }
    }

    /// Raw entry listing with arbitrary filters (`GET /entries`).
    pub async fn entries(&self, filters: &[(&str, &str)]) -> Value {
        self.get_json::<Value>("/entries", filters)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "entry listing failed");
                json!({"data": []})
            })
    }

    /// Entries plus patterns and relationships around `query` (`GET /context`).
    pub async fn context(&self, query: &str) -> Value {
        self.get_json::<Value>("/context", &[("query", query)])
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "context lookup failed");
                json!({"entries": [], "patterns": [], "relationships": []})
            })
    }

    /// Persist a new entry (`POST /sync`).
    pub async fn store(&self, entry: &NewEntry) -> StoreOutcome {
        let response = match self.client.post(self.url("/sync")).json(entry).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "knowledge store unreachable");
                return StoreOutcome::failed(e.to_string());
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!(status = status.as_u16(), "knowledge store rejected entry");
            return StoreOutcome::failed(body);
        }

        let raw: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let success = raw.get("success").and_then(Value::as_bool).unwrap_or(true);
        let id = raw.get("id").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let error = if success {
            None
        } else {
            raw.get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| Some(body.clone()))
        };
        StoreOutcome {
            success,
            id,
            error,
            raw,
        }
    }

    /// Reachability probe against `GET /dashboard` with the short probe timeout.
    pub async fn probe(&self) -> Result<(), KnowError> {
        let response = self
            .client
            .get(self.url("/dashboard"))
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| KnowError::Knowledge {
                message: format!("prefrontal unreachable: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(KnowError::Knowledge {
                message: format!("prefrontal probe failed: {}", status.as_u16()),
                source: None,
            })
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, KnowError> {
        let url = Url::parse_with_params(&self.url(path), params).map_err(|e| {
            KnowError::Knowledge {
                message: format!("invalid knowledge URL: {e}"),
                source: Some(Box::new(e)),
            }
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| KnowError::Knowledge {
                message: format!("request to {path} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KnowError::Knowledge {
                message: format!("{path} returned {}", status.as_u16()),
                source: None,
            });
        }

        response.json::<T>().await.map_err(|e| KnowError::Knowledge {
            message: format!("undecodable response from {path}: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
