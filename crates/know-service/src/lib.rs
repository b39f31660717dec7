// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query orchestration for the know query gateway.
//!
//! Three flows are offered: a knowledge-grounded single query (cached), a
//! direct query that skips retrieval and caching, and a multi-model consensus
//! fan-out over one shared prompt.

pub mod service;

pub use service::{DEFAULT_CONSENSUS_MODELS, DEFAULT_CONTEXT_LIMIT, KnowledgeAiService};
