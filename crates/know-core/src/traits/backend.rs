// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI backend trait (OpenCode serve and test doubles).

use async_trait::async_trait;

use crate::error::KnowError;
use crate::traits::adapter::Adapter;
use crate::types::BackendResponse;

/// Dispatches a finished prompt to a provider/model pair.
///
/// Per-call timeouts are the implementation's concern. Failures surface as
/// [`KnowError::Backend`]; the core never retries.
#[async_trait]
pub trait AiBackend: Adapter {
    async fn invoke(
        &self,
        prompt: &str,
        provider: &str,
        model: &str,
    ) -> Result<BackendResponse, KnowError>;
}
