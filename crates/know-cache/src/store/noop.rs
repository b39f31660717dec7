// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use know_core::{CacheStore, KnowError};

/// Store used when caching is disabled: remembers nothing, reports nothing removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

#[async_trait]
impl CacheStore for NoopCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KnowError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), KnowError> {
        Ok(())
    }

    async fn forget(&self, _key: &str) -> Result<bool, KnowError> {
        Ok(false)
    }

    async fn flush(&self) -> Result<bool, KnowError> {
        Ok(false)
    }
}
