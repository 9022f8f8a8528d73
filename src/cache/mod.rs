//
//  cdek-client
//  cache/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Cache Stores
//!
//! Key-value storage with expiry, used for two things:
//!
//! - the OAuth access token (one entry per account), and
//! - delivery-point query results (one entry per normalised filter set).
//!
//! Values are opaque strings; callers serialise to JSON before storing.
//!
//! ## Implementations
//!
//! - [`MemoryCache`]: in-process, backed by `moka`. The default.
//! - [`FileCache`]: one file per key in a directory, so separate processes
//!   (for example consecutive `cdek` invocations) share entries.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use cdek_client::cache::{CacheStore, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! cache.set("greeting", "hello", Some(Duration::from_secs(60))).unwrap();
//! assert_eq!(cache.get("greeting").as_deref(), Some("hello"));
//!
//! cache.delete("greeting").unwrap();
//! assert!(cache.get("greeting").is_none());
//! ```

mod file;

pub use file::*;

use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;
use thiserror::Error;

/// Default lifetime of entries stored without an explicit TTL.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Default maximum number of entries held by a [`MemoryCache`].
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Errors raised by cache stores.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading or writing the backing storage failed.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry could not be encoded or decoded.
    #[error("Cache encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A key-value store whose entries expire.
///
/// `ttl = None` means "use the store's default lifetime". Implementations must
/// never return an expired entry from [`get`](Self::get).
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key`, if present and not expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Removes the entry under `key`. Missing keys are not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache with per-entry expiry.
pub struct MemoryCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Creates a cache with the default TTL and capacity.
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_CACHE_TTL)
    }

    /// Creates a cache whose entries default to `ttl`.
    pub fn with_default_ttl(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(DEFAULT_MAX_CAPACITY)
                .expire_after(EntryExpiry)
                .build(),
            default_ttl: ttl,
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.inner.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl: ttl.unwrap_or(self.default_ttl),
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.invalidate(key);
        Ok(())
    }
}
