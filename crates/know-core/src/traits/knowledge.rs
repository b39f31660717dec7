// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge store trait.

use async_trait::async_trait;

use crate::traits::adapter::Adapter;
use crate::types::{KnowledgeContext, NewEntry, StoreOutcome};

/// Remote knowledge base used to ground prompts.
///
/// Neither operation returns an error: ordinary failures degrade to an empty
/// context or an unsuccessful [`StoreOutcome`].
#[async_trait]
pub trait KnowledgeStore: Adapter {
    /// Returns up to `limit` entries relevant to `query`, ranked by the store.
    async fn search(&self, query: &str, limit: usize) -> KnowledgeContext;

    /// Persists a new entry.
    async fn store(&self, entry: &NewEntry) -> StoreOutcome;
}
