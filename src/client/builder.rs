//! Builder for [`RecipeClient`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};

use super::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, RecipeClient};
use crate::cache::{CacheConfig, CacheStore, MemoryStorage, Storage};
use crate::clock::{Clock, SystemClock};
use crate::retry::RetryConfig;
use crate::{Result, SaucierError};

/// Coalescing map capacity; only one key per day is ever in flight.
const IN_FLIGHT_CAPACITY: u64 = 64;

/// Builder for configuring a [`RecipeClient`].
///
/// Only the API key is required. Without an explicit cache the client
/// uses an in-memory store built from [`storage()`](Self::storage),
/// [`cache_config()`](Self::cache_config) and [`clock()`](Self::clock).
pub struct RecipeClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
    storage: Option<Arc<dyn Storage>>,
    cache_config: CacheConfig,
    cache: Option<Arc<CacheStore>>,
    clock: Option<Arc<dyn Clock>>,
    retry: RetryConfig,
}

impl RecipeClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            storage: None,
            cache_config: CacheConfig::default(),
            cache: None,
            clock: None,
            retry: RetryConfig::default(),
        }
    }

    /// Bearer token sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Base URL of the recipe API (for proxies and wiremock).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request timeout. Default: 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Storage backend for the cache. Default: [`MemoryStorage`].
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Prefix and TTL for the cache.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Use an existing cache store. Overrides `storage` and `cache_config`.
    ///
    /// The store keeps its own clock for timestamps.
    pub fn cache(mut self, cache: Arc<CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Clock for date-dependent keys and cache timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Retry policy for list and search calls.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Build the client.
    ///
    /// Fails when the API key is missing or blank, or the base URL cannot
    /// carry a path.
    pub fn build(self) -> Result<RecipeClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SaucierError::Configuration("recipe API key is required".into()))?;

        let base_url = Url::parse(&self.base_url).map_err(|e| {
            SaucierError::Configuration(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SaucierError::Configuration(format!(
                "base URL {:?} cannot carry a path",
                self.base_url
            )));
        }

        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| SaucierError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let cache = match self.cache {
            Some(cache) => cache,
            None => {
                let storage = self
                    .storage
                    .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
                Arc::new(CacheStore::new(storage, clock.clone(), self.cache_config))
            }
        };

        Ok(RecipeClient {
            http,
            base_url,
            api_key,
            cache,
            clock,
            retry: self.retry,
            in_flight: moka::future::Cache::builder()
                .max_capacity(IN_FLIGHT_CAPACITY)
                .build(),
        })
    }
}

impl Default for RecipeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
