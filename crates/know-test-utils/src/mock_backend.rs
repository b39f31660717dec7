// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock AI backend for deterministic testing.
//!
//! `MockBackend` implements `AiBackend` with pre-configured responses and
//! records every call so tests can assert on the prompt and route used.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use know_core::{Adapter, AdapterType, AiBackend, BackendResponse, HealthStatus, KnowError};

/// One recorded `invoke` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub provider: String,
    pub model: String,
}

/// A mock backend that returns queued responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty the reply
/// is `"mock response from <provider>/<model>"`. Models registered with
/// [`MockBackend::fail_model`] always fail with a backend error.
#[derive(Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<VecDeque<String>>>,
    per_model: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Option<Duration>,
    unavailable: Arc<AtomicBool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock backend pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::default()
        }
    }

    /// Sleep this long inside every `invoke`, to make concurrency observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Always answer `model` with `text`, ahead of the queue.
    pub async fn respond_for(&self, model: impl Into<String>, text: impl Into<String>) {
        self.per_model.lock().await.insert(model.into(), text.into());
    }

    /// Make every call to `model` fail with `message`.
    pub async fn fail_model(&self, model: impl Into<String>, message: impl Into<String>) {
        self.failing.lock().await.insert(model.into(), message.into());
    }

    /// Report the backend as down from `health_check`.
    pub fn set_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl Adapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, KnowError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("mock backend down".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl AiBackend for MockBackend {
    async fn invoke(
        &self,
        prompt: &str,
        provider: &str,
        model: &str,
    ) -> Result<BackendResponse, KnowError> {
        self.calls.lock().await.push(RecordedCall {
            prompt: prompt.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failing.lock().await.get(model) {
            return Err(KnowError::backend(message.clone()));
        }

        if let Some(text) = self.per_model.lock().await.get(model) {
            return Ok(BackendResponse::text_only(text.clone()));
        }

        let text = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| format!("mock response from {provider}/{model}"));
        Ok(BackendResponse::text_only(text))
    }
}
