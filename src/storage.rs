use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Persisted cache document, one file per requested URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fetch time, epoch seconds.
    #[serde(rename = "cTime")]
    pub c_time: i64,
    pub url: String,
    /// Base64-encoded payload bytes; the file itself is text.
    pub data: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the payload cached for `url` when the entry is at most
    /// `max_age_secs` old at time `now`. A missing, corrupt or unreadable
    /// entry behaves as a miss, never as an error.
    async fn get(&self, url: &str, max_age_secs: i64, now: i64) -> Option<Vec<u8>>;

    /// (Over)writes the full entry for `url` with fetch time `now`.
    async fn put(&self, url: &str, payload: &[u8], now: i64) -> Result<()>;
}

/// File-backed store: `<dir>/<sha256(url) hex>.cache`, JSON content.
/// Files are keyed per URL, so writers for different URLs never conflict;
/// the last writer wins for the same URL.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{}.cache", hex::encode(digest)))
    }

    async fn read_entry(&self, path: &Path) -> Result<CacheEntry> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| Error::CacheRead(e.to_string()))?;
        serde_json::from_slice(&raw).map_err(|e| Error::CacheRead(e.to_string()))
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get(&self, url: &str, max_age_secs: i64, now: i64) -> Option<Vec<u8>> {
        let path = self.entry_path(url);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }
        let entry = match self.read_entry(&path).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), "treating cache entry as miss: {e}");
                return None;
            }
        };
        if now > entry.c_time + max_age_secs {
            debug!(url, age = now - entry.c_time, "cache entry is stale");
            return None;
        }
        match BASE64.decode(entry.data.as_bytes()) {
            Ok(bytes) => {
                debug!(url, bytes = bytes.len(), "cache hit");
                Some(bytes)
            }
            Err(e) => {
                warn!(path = %path.display(), "treating cache entry as miss: {e}");
                None
            }
        }
    }

    async fn put(&self, url: &str, payload: &[u8], now: i64) -> Result<()> {
        let entry = CacheEntry {
            c_time: now,
            url: url.to_string(),
            data: BASE64.encode(payload),
        };
        let raw = serde_json::to_vec(&entry)?;
        let path = self.entry_path(url);
        tokio::fs::write(&path, raw).await?;
        debug!(url, path = %path.display(), "cache write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn round_trip() {
        let (_dir, store) = store();
        store.put("https://example.test/menu", b"payload", 1000).await.unwrap();
        let got = store.get("https://example.test/menu", 3600, 1000).await;
        assert_eq!(got.as_deref(), Some(&b"payload"[..]));
    }

    #[tokio::test]
    async fn unknown_url_is_a_miss() {
        let (_dir, store) = store();
        assert!(store.get("https://example.test/other", 3600, 1000).await.is_none());
    }

    #[tokio::test]
    async fn entry_expires_after_max_age() {
        let (_dir, store) = store();
        store.put("https://example.test/menu", b"payload", 1000).await.unwrap();
        // Still valid exactly at the age limit, stale one second past it.
        assert!(store.get("https://example.test/menu", 60, 1060).await.is_some());
        assert!(store.get("https://example.test/menu", 60, 1061).await.is_none());
    }

    #[tokio::test]
    async fn overwrite_refreshes_entry() {
        let (_dir, store) = store();
        store.put("https://example.test/menu", b"old", 1000).await.unwrap();
        store.put("https://example.test/menu", b"new", 5000).await.unwrap();
        let got = store.get("https://example.test/menu", 60, 5010).await;
        assert_eq!(got.as_deref(), Some(&b"new"[..]));
    }

    #[tokio::test]
    async fn corrupt_entry_degrades_to_miss() {
        let (_dir, store) = store();
        store.put("https://example.test/menu", b"payload", 1000).await.unwrap();
        std::fs::write(store.entry_path("https://example.test/menu"), b"not json").unwrap();
        assert!(store.get("https://example.test/menu", 3600, 1000).await.is_none());
    }

    #[tokio::test]
    async fn bad_base64_degrades_to_miss() {
        let (_dir, store) = store();
        let path = {
            store.put("https://example.test/menu", b"payload", 1000).await.unwrap();
            store.entry_path("https://example.test/menu")
        };
        std::fs::write(&path, br#"{"cTime":1000,"url":"https://example.test/menu","data":"@@@"}"#)
            .unwrap();
        assert!(store.get("https://example.test/menu", 3600, 1000).await.is_none());
    }

    #[test]
    fn keys_are_distinct_per_url() {
        let (_dir, store) = store();
        assert_ne!(
            store.entry_path("https://example.test/a"),
            store.entry_path("https://example.test/b")
        );
        assert!(store
            .entry_path("https://example.test/a")
            .to_string_lossy()
            .ends_with(".cache"));
    }
}
