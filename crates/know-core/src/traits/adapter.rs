// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every external collaborator.

use async_trait::async_trait;

use crate::error::KnowError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and reachability shared by backend and knowledge-store clients.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the kind of collaborator this adapter fronts.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a lightweight reachability probe.
    ///
    /// Implementations apply their own short timeout; the core never calls this.
    async fn health_check(&self) -> Result<HealthStatus, KnowError>;

    /// `true` only when the probe reports [`HealthStatus::Healthy`].
    async fn is_available(&self) -> bool {
        matches!(self.health_check().await, Ok(HealthStatus::Healthy))
    }
}
