use std::{
    collections::HashMap,
    path::PathBuf,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{config, errors::CacheError};

/// Key the access token is cached under.
pub const ACCESS_TOKEN_KEY: &str = "spotify_access_token";

/// Lifetime of a cached access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Key-value store with per-entry time-to-live.
///
/// Expired entries behave exactly like missing ones: `has` returns `false`
/// and `get` fails with [`CacheError::Miss`].
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn has(&self, key: &str) -> bool;

    async fn get(&self, key: &str) -> Result<String, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// Process-local cache, lost on restart.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for MemoryCache {
    async fn has(&self, key: &str) -> bool {
        self.get(key).await.is_ok()
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                Err(CacheError::Miss(key.to_string()))
            }
            None => Err(CacheError::Miss(key.to_string())),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().await.insert(key.to_string(), entry);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    value: String,
    /// Unix timestamp in seconds.
    expires_at: i64,
}

/// Cache that keeps one JSON file per key, so a token survives restarts
/// and can be shared between `topsync serve` and `topsync sync`.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache rooted in the application's local data directory.
    pub fn in_data_dir() -> Self {
        Self::new(config::cache_dir())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    async fn remove(&self, key: &str) {
        let _ = async_fs::remove_file(self.entry_path(key)).await;
    }
}

#[async_trait]
impl TokenCache for FileCache {
    async fn has(&self, key: &str) -> bool {
        self.get(key).await.is_ok()
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let json = match async_fs::read_to_string(self.entry_path(key)).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CacheError::Miss(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let entry: FileEntry = serde_json::from_str(&json)?;
        if entry.expires_at <= Utc::now().timestamp() {
            self.remove(key).await;
            return Err(CacheError::Miss(key.to_string()));
        }

        Ok(entry.value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        async_fs::create_dir_all(&self.dir).await?;

        let entry = FileEntry {
            value,
            expires_at: Utc::now().timestamp() + ttl.as_secs() as i64,
        };
        let json = serde_json::to_string_pretty(&entry)?;
        async_fs::write(self.entry_path(key), json).await?;
        Ok(())
    }
}
