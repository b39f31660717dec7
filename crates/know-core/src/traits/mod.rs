// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The orchestration core talks to the AI backend, the knowledge store and the
//! cache store only through these traits. All use `#[async_trait]` so they can
//! be held as `Arc<dyn …>`.

pub mod adapter;
pub mod backend;
pub mod cache;
pub mod knowledge;

pub use adapter::Adapter;
pub use backend::AiBackend;
pub use cache::CacheStore;
pub use knowledge::KnowledgeStore;
