//
//  cdek-client
//  cache/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! File-backed cache store
//!
//! Each key is one JSON file, `<dir>/<key>.json`:
//!
//! ```json
//! {"expires_at": 1760630400, "value": "..."}
//! ```
//!
//! Expired files are removed the next time they are read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{CacheError, CacheStore, DEFAULT_CACHE_TTL};
use crate::api::client::LOG_TARGET;

#[derive(Serialize, Deserialize)]
struct FileEntry {
    expires_at: i64,
    value: String,
}

/// Cache store keeping one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    default_ttl: Duration,
}

impl FileCache {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            default_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Overrides the lifetime of entries stored without a TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// The directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    fn read_entry(&self, path: &Path) -> Result<Option<FileEntry>, CacheError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match self.read_entry(&path) {
            Ok(Some(entry)) if entry.expires_at > Utc::now().timestamp() => Some(entry.value),
            Ok(Some(_)) => {
                let _ = std::fs::remove_file(&path);
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(
                    target: LOG_TARGET,
                    "Discarding unreadable cache entry {}: {}",
                    path.display(),
                    e
                );
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = FileEntry {
            expires_at: Utc::now().timestamp() + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX / 2),
            value: value.to_string(),
        };
        std::fs::write(self.path_for(key), serde_json::to_string(&entry)?)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));

        cache.set("cdek_access_token_abc", "{\"a\":1}", None).unwrap();
        assert_eq!(cache.get("cdek_access_token_abc").as_deref(), Some("{\"a\":1}"));

        cache.delete("cdek_access_token_abc").unwrap();
        assert!(cache.get("cdek_access_token_abc").is_none());
        cache.delete("cdek_access_token_abc").unwrap();
    }

    #[test]
    fn test_expired_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let path = cache.path_for("old");
        std::fs::write(&path, r#"{"expires_at": 0, "value": "stale"}"#).unwrap();

        assert!(cache.get("old").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_keys_are_sanitised() {
        let cache = FileCache::new("/tmp/x");
        let path = cache.path_for("../../etc/passwd");
        assert_eq!(path.parent().unwrap(), Path::new("/tmp/x"));
    }

    #[test]
    fn test_corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        std::fs::write(cache.path_for("bad"), "not json").unwrap();
        assert!(cache.get("bad").is_none());
    }
}
