// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prefrontal knowledge store adapter for the know query gateway.

pub mod client;

use async_trait::async_trait;
use know_core::{
    Adapter, AdapterType, HealthStatus, KnowError, KnowledgeContext, KnowledgeStore, NewEntry,
    StoreOutcome,
};

pub use crate::client::PrefrontalClient;

#[async_trait]
impl Adapter for PrefrontalClient {
    fn name(&self) -> &str {
        "prefrontal"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Knowledge
    }

    async fn health_check(&self) -> Result<HealthStatus, KnowError> {
        Ok(match self.probe().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}

#[async_trait]
impl KnowledgeStore for PrefrontalClient {
    async fn search(&self, query: &str, limit: usize) -> KnowledgeContext {
        PrefrontalClient::search(self, query, limit).await
    }

    async fn store(&self, entry: &NewEntry) -> StoreOutcome {
        PrefrontalClient::store(self, entry).await
    }
}
