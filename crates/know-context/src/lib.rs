// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the know query gateway.
//!
//! Merges a query with the knowledge entries retrieved for it. An empty
//! context gets its own template telling the model it has no grounding.

pub mod prompt;

pub use prompt::{NO_KNOWLEDGE_MARKER, PromptBuilder};
