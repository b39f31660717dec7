// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the know query gateway.
//!
//! This crate provides the error type, the shared data model (routes,
//! knowledge entries, query and consensus results) and the collaborator
//! traits every other crate in the workspace builds on.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KnowError;
pub use types::{
    AdapterType, BackendResponse, ConsensusResult, HealthStatus, KnowledgeContext,
    KnowledgeEntry, ModelOutcome, ModelResponse, NewEntry, QueryResult, Route, RouteTemplate,
    StoreOutcome, Tier,
};

pub use traits::{Adapter, AiBackend, CacheStore, KnowledgeStore};
