// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response caching for the know query gateway.
//!
//! [`ResponseCache`] maps `(query, model id)` to a previously computed
//! [`know_core::QueryResult`]. Persistence is delegated to a
//! [`know_core::CacheStore`]: on disk, in memory, or nowhere when disabled.

pub mod response;
pub mod store;

pub use response::{KEY_PREFIX, ResponseCache, cache_key};
pub use store::{FileCacheStore, MemoryCacheStore, NoopCacheStore, store_from_config};
