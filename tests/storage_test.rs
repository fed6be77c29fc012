//! File-backed storage tests using temporary directories.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use saucier::cache::{FileStorage, Storage, StorageError};
use saucier::clock::ManualClock;
use saucier::{CacheConfig, CacheStore};

#[test]
fn values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");

    {
        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("culinary_sim_a", "1").unwrap();
        storage.set_item("unrelated", "keep").unwrap();
    }

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get_item("culinary_sim_a").as_deref(), Some("1"));
    assert_eq!(reopened.get_item("unrelated").as_deref(), Some("keep"));
}

#[test]
fn removal_is_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set_item("a", "1").unwrap();
    storage.remove_item("a");
    drop(storage);

    let reopened = FileStorage::open(&path).unwrap();
    assert!(reopened.keys().is_empty());
}

#[test]
fn corrupt_file_starts_empty_and_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "this is not json").unwrap();

    let storage = FileStorage::open(&path).unwrap();
    assert!(storage.keys().is_empty());

    storage.set_item("a", "1").unwrap();
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({"a": "1"}));
}

#[test]
fn quota_rejects_write_and_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");

    let storage = FileStorage::open(&path).unwrap().with_quota(16);
    storage.set_item("k", "small").unwrap();

    let err = storage.set_item("k2", "far too large for the quota").unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { quota: 16, .. }));
    assert_eq!(storage.get_item("k2"), None);

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.keys(), vec!["k".to_string()]);
}

#[test]
fn cache_store_over_file_storage_persists_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let clock = ManualClock::at_millis(1_700_000_000_000);

    {
        let storage = Arc::new(FileStorage::open(&path).unwrap());
        let cache = CacheStore::new(storage, Arc::new(clock.clone()), CacheConfig::default());
        cache.set("recipe_detail_42", &json!({"title": "Shakshuka"}));
    }

    let storage = Arc::new(FileStorage::open(&path).unwrap());
    let cache = CacheStore::new(storage, Arc::new(clock), CacheConfig::default());
    assert_eq!(
        cache.get("recipe_detail_42"),
        Some(json!({"title": "Shakshuka"}))
    );
}
