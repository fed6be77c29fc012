//! Caching subsystem.
//!
//! [`CacheStore`] is a namespaced, TTL'd key-value cache over a
//! [`Storage`] backend. Every remote call in
//! [`RecipeClient`](crate::RecipeClient) consults it first.
//!
//! # Entry format
//!
//! Each entry is stored as the JSON string `{"data": <value>, "timestamp":
//! <epoch-ms>}` under `<prefix><logical key>`. The prefix lets the cache
//! share a storage medium with unrelated application state: [`clear()`]
//! and the quota purge only ever touch prefixed keys.
//!
//! # Expiry and eviction
//!
//! - An entry older than the configured TTL is treated as absent and
//!   deleted on the next read. A TTL of `None` disables expiry.
//! - When a write fails with [`StorageError::QuotaExceeded`], every
//!   prefixed entry is purged once and the write retried. A second failure
//!   is logged and dropped. Caching is best-effort.
//! - There is no LRU and no per-key priority.
//!
//! [`clear()`]: CacheStore::clear

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::telemetry;

/// Default key namespace.
pub const DEFAULT_PREFIX: &str = "culinary_sim_";

/// Default time-to-live: 7 days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Configuration for the cache store.
///
/// ```rust
/// # use saucier::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .prefix("lab_")
///     .ttl(Duration::from_secs(24 * 3600));
/// assert_eq!(config.ttl, Some(Duration::from_secs(86_400)));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Namespace prepended to every logical key. Default: `culinary_sim_`.
    pub prefix: String,
    /// Entry lifetime. `None` keeps entries forever. Default: 7 days.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            ttl: Some(DEFAULT_TTL),
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key namespace.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the time-to-live for entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Keep entries until explicitly cleared or purged.
    pub fn no_expiry(mut self) -> Self {
        self.ttl = None;
        self
    }
}

/// The on-storage entry envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cached payload.
    pub data: Value,
    /// Write time, epoch milliseconds.
    pub timestamp: i64,
}

/// Size summary of the namespaced entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Number of namespaced entries.
    pub entries: usize,
    /// Total byte length of their serialized values.
    pub size_bytes: usize,
}

impl CacheStats {
    /// Size in kibibytes.
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Namespaced TTL cache over a [`Storage`] backend.
///
/// Callers never mutate entries in place: every update is a fresh
/// [`set()`](Self::set). Concurrent writers to one key race with
/// last-write-wins semantics.
pub struct CacheStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl CacheStore {
    /// Create a store over the given backend and clock.
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    /// Unbounded in-memory store with the system clock and default config.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(SystemClock),
            CacheConfig::default(),
        )
    }

    /// The active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.config.prefix)
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        let Some(ttl) = self.config.ttl else {
            return false;
        };
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.clock.now_millis().saturating_sub(entry.timestamp) > ttl_ms
    }

    /// Look up a cached value.
    ///
    /// Returns `None` on miss, on expiry (the entry is deleted), and on a
    /// corrupt entry (logged). Never fails.
    pub fn get(&self, key: &str) -> Option<Value> {
        let full_key = self.full_key(key);
        let Some(raw) = self.storage.get_item(&full_key) else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            return None;
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "unreadable cache entry");
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                return None;
            }
        };

        if self.is_expired(&entry) {
            debug!(key, "cache entry expired");
            self.storage.remove_item(&full_key);
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            return None;
        }

        debug!(key, "cache hit");
        metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        Some(entry.data)
    }

    /// Look up a cached value and decode it as `T`.
    ///
    /// An entry that no longer matches `T` is treated as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let data = self.get(key)?;
        match serde_json::from_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "cache entry has unexpected shape");
                None
            }
        }
    }

    /// Store a value under `key`, stamped with the current time.
    ///
    /// On a quota failure all namespaced entries are purged and the write
    /// retried once; if that fails too, the write is dropped.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "value not cacheable");
                return;
            }
        };
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now_millis(),
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "value not cacheable");
                return;
            }
        };

        let full_key = self.full_key(key);
        match self.storage.set_item(&full_key, &raw) {
            Ok(()) => debug!(key, "cache set"),
            Err(StorageError::QuotaExceeded { .. }) => {
                let purged = self.clear();
                metrics::counter!(telemetry::CACHE_PURGES_TOTAL).increment(1);
                warn!(key, purged, "storage quota exceeded, purged cache");
                if let Err(e) = self.storage.set_item(&full_key, &raw) {
                    warn!(key, error = %e, "cache write dropped after purge");
                }
            }
            Err(e) => warn!(key, error = %e, "cache write failed"),
        }
    }

    /// Remove one entry.
    pub fn remove(&self, key: &str) {
        self.storage.remove_item(&self.full_key(key));
    }

    /// Remove every namespaced entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let keys = self.namespaced_keys();
        for key in &keys {
            self.storage.remove_item(key);
        }
        debug!(count = keys.len(), "cleared cache");
        keys.len()
    }

    /// Count and measure the namespaced entries.
    pub fn stats(&self) -> CacheStats {
        self.namespaced_keys()
            .iter()
            .filter_map(|key| self.storage.get_item(key))
            .fold(CacheStats::default(), |mut stats, value| {
                stats.entries += 1;
                stats.size_bytes += value.len();
                stats
            })
    }

    fn namespaced_keys(&self) -> Vec<String> {
        self.storage
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&self.config.prefix))
            .collect()
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
