// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`CacheStore`] implementations.

use std::sync::Arc;

use know_config::model::{CacheBackend, CacheConfig};
use know_core::CacheStore;

pub mod file;
pub mod memory;
pub mod noop;

pub use file::FileCacheStore;
pub use memory::MemoryCacheStore;
pub use noop::NoopCacheStore;

/// Build the store selected by `[cache]` config. Disabled caching gets the no-op store.
pub fn store_from_config(config: &CacheConfig) -> Arc<dyn CacheStore> {
    if !config.enabled {
        return Arc::new(NoopCacheStore);
    }
    match config.backend {
        CacheBackend::File => Arc::new(FileCacheStore::new(&config.dir)),
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new()),
    }
}
