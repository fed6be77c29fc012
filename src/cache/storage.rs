//! String key-value storage backends.
//!
//! [`Storage`] mirrors the browser local-storage contract the cache was
//! designed around: flat string keys, string values, a size quota, and
//! key enumeration. Two backends ship with the crate:
//!
//! - [`MemoryStorage`]: process-local map, optionally quota-limited.
//! - [`FileStorage`]: a single JSON object on disk, rewritten atomically
//!   (tmp file + rename) on every mutation.
//!
//! Both count quota usage as the byte length of every key plus its value.
//!
//! [`FileStorage`] does blocking file I/O inside `set_item` and
//! `remove_item` while holding its lock. Async callers run it inline on
//! the executor thread, which is fine for a small local cache file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Storage backend failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {required} bytes needed, quota is {quota}")]
    QuotaExceeded { required: usize, quota: usize },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(String),
}

/// A flat string key-value store.
///
/// Implementations are internally synchronized; every method takes
/// `&self`.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the write would push
    /// the store past its quota; the store is left unchanged.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key` if present.
    fn remove_item(&self, key: &str);

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Vec<String>;
}

/// Check a pending write against the quota.
///
/// `entries` is the current content; the existing value for `key` (if any)
/// does not count since the write replaces it.
fn check_quota<'a>(
    entries: impl Iterator<Item = (&'a String, &'a String)>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let others: usize = entries
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    let required = others + key.len() + value.len();
    if required > quota {
        return Err(StorageError::QuotaExceeded { required, quota });
    }
    Ok(())
}

// ============================================================================
// MemoryStorage
// ============================================================================

/// In-memory storage, optionally limited to a byte quota.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Unbounded in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory storage that rejects writes past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(bytes),
        }
    }

    /// Total bytes used (keys plus values).
    pub fn used_bytes(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        check_quota(entries.iter(), key, value, self.quota)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.keys().cloned().collect()
    }
}

// ============================================================================
// FileStorage
// ============================================================================

/// Storage persisted as one JSON object file.
///
/// The whole map is held in memory and flushed to disk after each
/// mutation. A missing file starts empty; a corrupt file is logged and
/// replaced on the next write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl FileStorage {
    /// Open (or lazily create) storage at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = load_entries(&path)?;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
            quota: None,
        })
    }

    /// Limit the store to `bytes` (keys plus values).
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Default location: `~/.cache/saucier/storage.json`.
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("saucier")
            .join("storage.json")
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map to disk (atomic write via tmp + rename).
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(entries)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&content) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt storage file, starting empty");
            Ok(BTreeMap::new())
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        check_quota(entries.iter(), key, value, self.quota)?;
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            if let Err(e) = self.persist(&entries) {
                warn!(path = %self.path.display(), error = %e, "failed to persist storage removal");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").as_deref(), Some("1"));
        storage.remove_item("a");
        assert!(storage.get_item("a").is_none());
    }

    #[test]
    fn memory_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").unwrap();
        let err = storage.set_item("j", "123456").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 10, .. }));
        assert!(storage.get_item("j").is_none());
    }

    #[test]
    fn memory_quota_ignores_replaced_value() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345678").unwrap();
        // Replacing "k" only needs room for the new value.
        storage.set_item("k", "87654321").unwrap();
        assert_eq!(storage.used_bytes(), 9);
    }

    #[test]
    fn file_storage_starts_empty_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("missing.json")).unwrap();
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn file_storage_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("storage.json");
        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn default_path_ends_with_storage_json() {
        assert!(FileStorage::default_path().ends_with("saucier/storage.json"));
    }
}
