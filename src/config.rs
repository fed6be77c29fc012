//! Configuration loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. Explicit path (e.g. `--config <path>`)
//! 2. `~/.saucier/config.toml`
//! 3. Built-in defaults
//!
//! The API key may live in the file (`[api] key`) or in the
//! `SAUCIER_API_KEY` environment variable; the file wins.
//!
//! ```toml
//! [api]
//! base_url = "https://api.foodoscope.com"
//! timeout_secs = 30
//!
//! [cache]
//! prefix = "culinary_sim_"
//! ttl_hours = 168   # 0 = never expire
//! quota_bytes = 5242880
//!
//! [retry]
//! max_attempts = 2
//! initial_delay_ms = 250
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{CacheConfig, CacheStore, DEFAULT_PREFIX, FileStorage, Storage};
use crate::client::{DEFAULT_BASE_URL, RecipeClientBuilder};
use crate::flavor::{DEFAULT_FLAVORDB_URL, FlavorClient};
use crate::retry::RetryConfig;
use crate::{Result, SaucierError};

/// Environment variable holding the recipe API key.
pub const API_KEY_ENV: &str = "SAUCIER_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub flavordb: FlavorSettings,
}

/// Recipe API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token; falls back to `SAUCIER_API_KEY`.
    #[serde(default)]
    pub key: Option<String>,
    /// Request timeout in seconds, 0 disables it (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Entry lifetime in hours, 0 keeps entries forever (default: 168).
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Storage file (default: `<cache dir>/saucier/storage.json`).
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    /// Storage quota in bytes; unlimited when unset.
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            ttl_hours: default_ttl_hours(),
            storage_path: None,
            quota_bytes: None,
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_ttl_hours() -> u64 {
    7 * 24
}

/// Retry settings for list and search calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    250
}

/// FlavorDB settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FlavorSettings {
    #[serde(default = "default_flavordb_url")]
    pub base_url: String,
}

impl Default for FlavorSettings {
    fn default() -> Self {
        Self {
            base_url: default_flavordb_url(),
        }
    }
}

fn default_flavordb_url() -> String {
    DEFAULT_FLAVORDB_URL.to_string()
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, `~/.saucier/config.toml`
    /// is used when present, else the defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SaucierError::Configuration(format!("Failed to parse config: {e}")))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SaucierError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SaucierError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SaucierError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".saucier").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    /// API key from the file, falling back to `SAUCIER_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.api
            .key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Cache prefix and TTL.
    pub fn cache_config(&self) -> CacheConfig {
        let config = CacheConfig::new().prefix(self.cache.prefix.clone());
        match self.cache.ttl_hours {
            0 => config.no_expiry(),
            hours => config.ttl(Duration::from_secs(hours * 3600)),
        }
    }

    /// Retry policy.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .max_attempts(self.retry.max_attempts)
            .initial_delay(Duration::from_millis(self.retry.initial_delay_ms))
    }

    /// Open the file-backed storage.
    pub fn storage(&self) -> Result<Arc<dyn Storage>> {
        let path = self
            .cache
            .storage_path
            .clone()
            .unwrap_or_else(FileStorage::default_path);
        let mut storage = FileStorage::open(path)?;
        if let Some(quota) = self.cache.quota_bytes {
            storage = storage.with_quota(quota);
        }
        Ok(Arc::new(storage))
    }

    /// A client builder carrying every setting from this config.
    ///
    /// The key is left unset when neither the file nor the environment
    /// provides one; [`RecipeClientBuilder::build()`] then fails.
    pub fn client_builder(&self) -> Result<RecipeClientBuilder> {
        let mut builder = RecipeClientBuilder::new()
            .base_url(self.api.base_url.clone())
            .storage(self.storage()?)
            .cache_config(self.cache_config())
            .retry(self.retry_config());
        builder = match self.api.timeout_secs {
            0 => builder.no_timeout(),
            secs => builder.timeout(Duration::from_secs(secs)),
        };
        if let Some(key) = self.api_key() {
            builder = builder.api_key(key);
        }
        Ok(builder)
    }

    /// A FlavorDB client sharing `cache`.
    pub fn flavor_client(&self, cache: Arc<CacheStore>) -> Result<FlavorClient> {
        FlavorClient::with_base_url(cache, self.flavordb.base_url.clone())
    }
}
