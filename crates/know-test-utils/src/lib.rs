// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for know integration tests.
//!
//! Provides mock collaborators and a harness for fast, deterministic tests
//! without a running OpenCode server or knowledge store.
//!
//! # Components
//!
//! - [`MockBackend`] - AI backend with queued responses and per-model failures
//! - [`MockKnowledgeStore`] - Knowledge store with fixed entries and a failure switch
//! - [`TestHarness`] - A `KnowledgeAiService` wired to both mocks

pub mod harness;
pub mod mock_backend;
pub mod mock_knowledge;

pub use harness::TestHarness;
pub use mock_backend::{MockBackend, RecordedCall};
pub use mock_knowledge::MockKnowledgeStore;
