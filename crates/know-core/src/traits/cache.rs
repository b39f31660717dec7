// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic key-value store underneath the response cache.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::KnowError;

/// Opaque byte store with advisory TTL.
///
/// Expiry is the store's responsibility; callers only pass the TTL through.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KnowError>;

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), KnowError>;

    /// Returns whether the key existed.
    async fn forget(&self, key: &str) -> Result<bool, KnowError>;

    async fn flush(&self) -> Result<bool, KnowError>;
}
