// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response cache over the on-disk store, as the CLI uses it.

use know_cache::ResponseCache;
use know_config::model::{CacheBackend, CacheConfig};
use know_core::{BackendResponse, QueryResult, RouteTemplate, Tier};

fn config(dir: &std::path::Path) -> CacheConfig {
    CacheConfig {
        enabled: true,
        ttl: 3600,
        backend: CacheBackend::File,
        dir: dir.display().to_string(),
    }
}

fn sample() -> QueryResult {
    QueryResult {
        query: "why is the build slow".into(),
        response: BackendResponse {
            text: "Because of link time.".into(),
            message_id: Some("msg_1".into()),
            tokens: Some(serde_json::json!({"input": 120, "output": 30})),
            cost: Some(0.0021),
            raw: serde_json::json!({"info": {"id": "msg_1"}}),
        },
        model: RouteTemplate::new("anthropic", "claude-sonnet-4-5-20250929", Tier::Premium)
            .with_intent("why"),
        context_entries: 3,
    }
}

#[tokio::test]
async fn answers_persist_across_cache_instances() {
    let dir = tempfile::tempdir().unwrap();
    let first = ResponseCache::from_config(&config(dir.path()));
    first
        .put("why is the build slow", "claude-sonnet-4-5-20250929", &sample())
        .await;

    let second = ResponseCache::from_config(&config(dir.path()));
    let hit = second
        .get("why is the build slow", "claude-sonnet-4-5-20250929")
        .await
        .expect("entry written by the first instance");
    assert_eq!(hit, sample());
}

#[tokio::test]
async fn unwritable_directory_degrades_to_miss() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"a file, not a directory").unwrap();

    let cache = ResponseCache::from_config(&config(&blocker.join("cache")));
    cache.put("q", "m", &sample()).await;
    assert_eq!(cache.get("q", "m").await, None);
    assert!(!cache.forget("q", "m").await);
}
