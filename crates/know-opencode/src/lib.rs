// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenCode serve backend adapter for the know query gateway.
//!
//! Implements [`AiBackend`] over the `opencode serve` session API, which in
//! turn fans out to whichever provider/model pair a route names.

pub mod client;
pub mod types;

use async_trait::async_trait;
use know_core::{
    Adapter, AdapterType, AiBackend, BackendResponse, HealthStatus, KnowError,
};
use tracing::debug;

pub use crate::client::OpenCodeClient;

#[async_trait]
impl Adapter for OpenCodeClient {
    fn name(&self) -> &str {
        "opencode"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, KnowError> {
        match self.probe().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => {
                debug!(error = %e, "opencode probe failed");
                Ok(HealthStatus::Unhealthy(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl AiBackend for OpenCodeClient {
    async fn invoke(
        &self,
        prompt: &str,
        provider: &str,
        model: &str,
    ) -> Result<BackendResponse, KnowError> {
        self.prompt(prompt, provider, model).await
    }
}
