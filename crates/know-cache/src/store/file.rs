// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk cache store: one JSON envelope per key under a directory.
//!
//! Lets a short-lived CLI process reuse answers from earlier invocations.
//! Expired envelopes are misses and are removed when next read.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use know_core::{CacheStore, KnowError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File-name prefix for entries this store owns; `flush` touches nothing else.
const FILE_PREFIX: &str = "knowledge-";
const FILE_SUFFIX: &str = ".json";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    key: String,
    expires_at: DateTime<Utc>,
    /// Hex-encoded value bytes.
    payload: String,
}

/// Cache store writing one file per key under `dir`.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let stem: String = key
            .strip_prefix("knowledge:")
            .unwrap_or(key)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        self.dir.join(format!("{FILE_PREFIX}{stem}{FILE_SUFFIX}"))
    }

    async fn remove(path: &Path) -> Result<bool, KnowError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KnowError::cache(
                format!("failed to remove {}", path.display()),
                e,
            )),
        }
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KnowError> {
        let path = self.path_for(key);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(KnowError::cache(
                    format!("failed to read {}", path.display()),
                    e,
                ));
            }
        };

        let envelope: Envelope = match serde_json::from_slice(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "discarding corrupt cache file");
                Self::remove(&path).await?;
                return Ok(None);
            }
        };

        // Sanitised file names can collide; the envelope carries the real key.
        if envelope.key != key {
            return Ok(None);
        }

        if envelope.expires_at <= Utc::now() {
            debug!(path = %path.display(), "cache file expired");
            Self::remove(&path).await?;
            return Ok(None);
        }

        match hex::decode(&envelope.payload) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) => Err(KnowError::cache(
                format!("corrupt payload in {}", path.display()),
                e,
            )),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), KnowError> {
        let path = self.path_for(key);
        if ttl.is_zero() {
            Self::remove(&path).await?;
            return Ok(());
        }

        let ttl = TimeDelta::from_std(ttl)
            .map_err(|e| KnowError::cache("cache ttl out of range", e))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let envelope = Envelope {
            key: key.to_string(),
            expires_at,
            payload: hex::encode(value),
        };
        let body = serde_json::to_vec(&envelope)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| KnowError::cache(format!("failed to create {}", self.dir.display()), e))?;

        // Write-then-rename so concurrent readers never see a torn file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| KnowError::cache(format!("failed to write {}", tmp.display()), e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| KnowError::cache(format!("failed to replace {}", path.display()), e))?;
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<bool, KnowError> {
        Self::remove(&self.path_for(key)).await
    }

    async fn flush(&self) -> Result<bool, KnowError> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => {
                return Err(KnowError::cache(
                    format!("failed to list {}", self.dir.display()),
                    e,
                ));
            }
        };

        let mut removed = 0usize;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| KnowError::cache("failed to read cache directory", e))?
        {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                Self::remove(&entry.path()).await?;
                removed += 1;
            }
        }
        debug!(removed, dir = %self.dir.display(), "flushed file cache");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn round_trip_survives_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path());
        store
            .put("knowledge:abc123", b"{\"a\":1}".to_vec(), HOUR)
            .await
            .unwrap();

        let reopened = FileCacheStore::new(dir.path());
        assert_eq!(
            reopened.get("knowledge:abc123").await.unwrap(),
            Some(b"{\"a\":1}".to_vec())
        );
        assert!(dir.path().join("knowledge-abc123.json").exists());
    }

    #[tokio::test]
    async fn missing_dir_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path().join("not-yet"));
        assert_eq!(store.get("knowledge:x").await.unwrap(), None);
        assert!(!store.forget("knowledge:x").await.unwrap());
        assert!(store.flush().await.unwrap());
    }

    #[tokio::test]
    async fn expired_file_is_removed_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path());
        store
            .put("knowledge:old", vec![1, 2, 3], Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.get("knowledge:old").await.unwrap(), None);
        assert!(!dir.path().join("knowledge-old.json").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("knowledge-bad.json"), b"not json").unwrap();
        let store = FileCacheStore::new(dir.path());
        assert_eq!(store.get("knowledge:bad").await.unwrap(), None);
    }

    #[tokio::test]
    async fn flush_leaves_foreign_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path());
        store.put("knowledge:a", vec![1], HOUR).await.unwrap();
        store.put("knowledge:b", vec![2], HOUR).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        assert!(store.flush().await.unwrap());
        assert_eq!(store.get("knowledge:a").await.unwrap(), None);
        assert!(dir.path().join("notes.txt").exists());
    }
}
