//! Cache manager for memoizing route responses in memory
//!
//! Provides a `CacheManager` that stores serializable data as JSON values with
//! expiry timestamps. Entries are checked lazily: a read after the expiry time
//! drops the entry and reports a miss.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default time-to-live for cached responses in seconds
pub const DEFAULT_TTL_SECS: i64 = 600;

/// A single stored response
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached data
    data: Value,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Result of a cache hit
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
}

/// Process-wide response cache with a fixed TTL
///
/// Cloning is cheap and every clone shares the same entries, so one instance can
/// be handed to the API layer at construction time. There is no size bound and
/// no eviction besides expiry.
#[derive(Debug, Clone)]
pub struct CacheManager {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl CacheManager {
    /// Creates a cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are plain values, a panic mid-write cannot leave one half-built
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores data under `key`, replacing any previous entry
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if the data cannot be represented as JSON
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<(), serde_json::Error> {
        let data = serde_json::to_value(data)?;
        let now = Utc::now();
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: now + self.ttl,
        };

        self.lock().insert(key.to_string(), entry);
        Ok(())
    }

    /// Reads data from the cache
    ///
    /// Returns `None` if the key is missing, the entry has expired, or the stored
    /// value does not deserialize into `T`. Expired entries are removed.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let now = Utc::now();
        let mut entries = self.lock();

        let entry = entries.get(key)?;
        if entry.is_expired(now) {
            entries.remove(key);
            return None;
        }

        let data = serde_json::from_value(entry.data.clone()).ok()?;
        Some(CachedData {
            data,
            cached_at: entry.cached_at,
        })
    }

    /// Number of stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}
