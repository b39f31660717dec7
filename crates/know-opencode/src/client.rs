// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenCode serve session API.
//!
//! Provides [`OpenCodeClient`], which lazily creates one session and sends
//! every prompt through it with an explicit provider/model selection.

use std::time::Duration;

use know_config::model::OpenCodeConfig;
use know_core::{BackendResponse, KnowError};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::types::{MessageResponse, ModelRef, PromptRequest, RequestPart, SessionResponse};

/// HTTP client for a running `opencode serve`.
///
/// Concurrent first callers share a single session creation; the session id
/// is then reused until the server forgets it.
#[derive(Debug)]
pub struct OpenCodeClient {
    client: reqwest::Client,
    base_url: String,
    probe_timeout: Duration,
    session: Mutex<Option<String>>,
}

impl OpenCodeClient {
    /// Creates a client for `base_url` (e.g. `http://127.0.0.1:4096`).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, KnowError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| KnowError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            probe_timeout,
            session: Mutex::new(None),
        })
    }

    pub fn from_config(config: &OpenCodeConfig) -> Result<Self, KnowError> {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.probe_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The current session id, if one has been created.
    pub async fn session_id(&self) -> Option<String> {
        self.session.lock().await.clone()
    }

    /// Creates a fresh session and makes it current.
    pub async fn create_session(&self) -> Result<String, KnowError> {
        let id = self.request_session().await?;
        *self.session.lock().await = Some(id.clone());
        Ok(id)
    }

    /// Sends `message` to `provider/model` and returns the assistant's answer.
    ///
    /// A session the server no longer knows (404) is replaced once.
    pub async fn prompt(
        &self,
        message: &str,
        provider: &str,
        model: &str,
    ) -> Result<BackendResponse, KnowError> {
        let session_id = self.ensure_session().await?;
        match self.send_prompt(&session_id, message, provider, model).await {
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND.as_u16()) => {
                warn!(session_id = session_id.as_str(), "session unknown to server, creating a new one");
                self.forget_session(&session_id).await;
                let session_id = self.ensure_session().await?;
                self.send_prompt(&session_id, message, provider, model).await
            }
            other => other,
        }
    }

    /// Models advertised by the server (`GET /models`).
    pub async fn models(&self) -> Result<serde_json::Value, KnowError> {
        self.get_json("/models", "Failed to fetch models").await
    }

    /// Configured providers (`GET /provider`).
    pub async fn providers(&self) -> Result<serde_json::Value, KnowError> {
        self.get_json("/provider", "Failed to fetch providers").await
    }

    /// Reachability probe against `GET /doc` with the short probe timeout.
    pub async fn probe(&self) -> Result<(), KnowError> {
        let response = self
            .client
            .get(self.url("/doc"))
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(KnowError::Backend {
                message: format!("OpenCode probe failed: {}", status.as_u16()),
                status: Some(status.as_u16()),
                source: None,
            })
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn ensure_session(&self) -> Result<String, KnowError> {
        let mut session = self.session.lock().await;
        if let Some(id) = session.as_ref() {
            return Ok(id.clone());
        }
        let id = self.request_session().await?;
        *session = Some(id.clone());
        Ok(id)
    }

    async fn forget_session(&self, stale: &str) {
        let mut session = self.session.lock().await;
        if session.as_deref() == Some(stale) {
            *session = None;
        }
    }

    async fn request_session(&self) -> Result<String, KnowError> {
        let response = self
            .client
            .post(self.url("/session"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KnowError::Backend {
                message: format!("Failed to create session: {}", status.as_u16()),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        let body: SessionResponse = response.json().await.map_err(|e| KnowError::Backend {
            message: format!("Failed to create session: unreadable response: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;
        let id = body.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            KnowError::backend("Failed to create session: response carried no session id")
        })?;
        debug!(session_id = id.as_str(), "created opencode session");
        Ok(id)
    }

    async fn send_prompt(
        &self,
        session_id: &str,
        message: &str,
        provider: &str,
        model: &str,
    ) -> Result<BackendResponse, KnowError> {
        let request = PromptRequest {
            parts: vec![RequestPart {
                type_: "text",
                text: message,
            }],
            model: ModelRef {
                provider_id: provider,
                model_id: model,
            },
        };

        let response = self
            .client
            .post(self.url(&format!("/session/{session_id}/message")))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, provider, model, "prompt response received");

        let body = response.text().await.map_err(|e| KnowError::Backend {
            message: format!("failed to read response body: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(KnowError::Backend {
                message: format!("OpenCode prompt failed: {} {body}", status.as_u16()),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| KnowError::Backend {
                message: format!("failed to parse OpenCode response: {e}"),
                status: Some(status.as_u16()),
                source: Some(Box::new(e)),
            })?;
        let parsed: MessageResponse =
            serde_json::from_value(raw.clone()).map_err(|e| KnowError::Backend {
                message: format!("failed to parse OpenCode response: {e}"),
                status: Some(status.as_u16()),
                source: Some(Box::new(e)),
            })?;

        let info = parsed.info.clone().unwrap_or_default();
        if let Some(error) = &info.error {
            return Err(KnowError::backend(format!(
                "Model error ({provider}/{model}): {}",
                error.message()
            )));
        }

        Ok(BackendResponse {
            text: parsed.text(),
            message_id: info.id,
            tokens: info.tokens,
            cost: info.cost,
            raw,
        })
    }

    async fn get_json(&self, path: &str, context: &str) -> Result<serde_json::Value, KnowError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(KnowError::Backend {
                message: format!("{context}: {}", status.as_u16()),
                status: Some(status.as_u16()),
                source: None,
            });
        }
        response.json().await.map_err(|e| KnowError::Backend {
            message: format!("{context}: unreadable response: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> KnowError {
        let message = if e.is_connect() {
            format!("Connection refused: could not reach OpenCode at {}", self.base_url)
        } else if e.is_timeout() {
            format!("OpenCode request to {} timed out", self.base_url)
        } else {
            format!("OpenCode request failed: {e}")
        };
        KnowError::Backend {
            message,
            status: None,
            source: Some(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenCodeClient {
        OpenCodeClient::new(base_url, Duration::from_secs(5), Duration::from_secs(1)).unwrap()
    }

    async fn mount_session(server: &MockServer, id: &str) {
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": id})))
            .mount(server)
            .await;
    }

    fn answer(text: &str) -> serde_json::Value {
        serde_json::json!({
            "info": {"id": "msg-1", "tokens": {"input": 10, "output": 5}, "cost": 0.001},
            "parts": [{"type": "text", "text": text}]
        })
    }

    #[test]
    fn base_url_from_config() {
        let config = OpenCodeConfig {
            host: "10.0.0.1".into(),
            port: 9999,
            ..OpenCodeConfig::default()
        };
        let client = OpenCodeClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.1:9999");
    }

    #[tokio::test]
    async fn creates_a_session() {
        let server = MockServer::start().await;
        mount_session(&server, "test-session-123").await;

        let client = test_client(&server.uri());
        assert_eq!(client.session_id().await, None);
        assert_eq!(client.create_session().await.unwrap(), "test-session-123");
        assert_eq!(
            client.session_id().await.as_deref(),
            Some("test-session-123")
        );
    }

    #[tokio::test]
    async fn sends_prompt_with_model_selection() {
        let server = MockServer::start().await;
        mount_session(&server, "sess-1").await;
        Mock::given(method("POST"))
            .and(path("/session/sess-1/message"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "parts": [{"type": "text", "text": "What is Laravel?"}],
                "model": {"providerID": "xai", "modelID": "grok-3"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("AI response here")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.prompt("What is Laravel?", "xai", "grok-3").await.unwrap();

        assert_eq!(result.text, "AI response here");
        assert_eq!(result.message_id.as_deref(), Some("msg-1"));
        assert_eq!(result.tokens.unwrap()["input"], 10);
        assert_eq!(result.cost, Some(0.001));
        assert_eq!(result.raw["parts"][0]["text"], "AI response here");
    }

    #[tokio::test]
    async fn session_is_created_once_and_reused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "auto-sess"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/session/auto-sess/message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("ok")))
            .expect(3)
            .mount(&server)
            .await;

        let client = std::sync::Arc::new(test_client(&server.uri()));
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let client = std::sync::Arc::clone(&client);
                tokio::spawn(async move { client.prompt("test", "xai", "grok-3").await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().text, "ok");
        }
        assert_eq!(client.session_id().await.as_deref(), Some("auto-sess"));
    }

    #[tokio::test]
    async fn stale_session_is_replaced_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "old"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "new"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/session/old/message"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such session"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/session/new/message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("fresh")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(client.prompt("q", "xai", "grok-3").await.unwrap().text, "fresh");
        assert_eq!(client.session_id().await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn failed_prompt_carries_status_and_body() {
        let server = MockServer::start().await;
        mount_session(&server, "sess").await;
        Mock::given(method("POST"))
            .and(path("/session/sess/message"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Error"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.prompt("test", "xai", "grok-3").await.unwrap_err();
        assert_eq!(err.to_string(), "OpenCode prompt failed: 500 Internal Error");
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn model_error_in_2xx_body_is_an_error() {
        let server = MockServer::start().await;
        mount_session(&server, "sess").await;
        Mock::given(method("POST"))
            .and(path("/session/sess/message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "info": {
                    "id": "msg-1",
                    "error": {"name": "APIError", "data": {"message": "Invalid API Key", "statusCode": 401}}
                },
                "parts": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .prompt("test", "groq", "llama-3.3-70b-versatile")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model error (groq/llama-3.3-70b-versatile): Invalid API Key"
        );
    }

    #[tokio::test]
    async fn string_model_error_in_2xx_body_is_an_error() {
        let server = MockServer::start().await;
        mount_session(&server, "sess").await;
        Mock::given(method("POST"))
            .and(path("/session/sess/message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "info": {"id": "m", "error": "provider rate limited"},
                "parts": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.prompt("q", "xai", "grok-3").await.unwrap_err();
        assert_eq!(err.to_string(), "Model error (xai/grok-3): provider rate limited");
    }

    #[tokio::test]
    async fn malformed_2xx_body_is_an_error() {
        let server = MockServer::start().await;
        mount_session(&server, "sess").await;
        Mock::given(method("POST"))
            .and(path("/session/sess/message"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"parts": "oops"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.prompt("q", "xai", "grok-3").await.unwrap_err();
        assert!(
            err.to_string().starts_with("failed to parse OpenCode response"),
            "got: {err}"
        );
        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn failed_session_creation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.create_session().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create session: 503");
        assert!(client.prompt("q", "p", "m").await.is_err());
        assert_eq!(client.session_id().await, None);
    }

    #[tokio::test]
    async fn fetches_models_and_providers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"provider": "anthropic", "model": "claude-opus-4-6"},
                {"provider": "groq", "model": "llama-3.3-70b-versatile"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/provider"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "all": {"anthropic": {"id": "anthropic", "models": {}}}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(client.models().await.unwrap().as_array().unwrap().len(), 2);
        assert!(client.providers().await.unwrap().get("all").is_some());
    }

    #[tokio::test]
    async fn probe_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.probe().await.is_err());
    }

    #[tokio::test]
    async fn unreachable_server_reports_connection_refused() {
        // Port 9 (discard) is essentially never listening locally.
        let client = test_client("http://127.0.0.1:9");
        let err = client.prompt("q", "p", "m").await.unwrap_err();
        assert!(err.to_string().contains("Connection refused"), "got: {err}");
    }
}
