//! Integration tests for [`CacheStore`]: TTL expiry, quota purge, clear
//! and stats over a shared storage medium.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use saucier::cache::{MemoryStorage, Storage};
use saucier::clock::ManualClock;
use saucier::{CacheConfig, CacheStore};

const DAY: Duration = Duration::from_secs(24 * 3600);

fn store_with(storage: Arc<MemoryStorage>, clock: &ManualClock, config: CacheConfig) -> CacheStore {
    CacheStore::new(storage, Arc::new(clock.clone()), config)
}

fn store(clock: &ManualClock) -> (CacheStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (store_with(storage.clone(), clock, CacheConfig::default()), storage)
}

// =============================================================================
// Round trip and expiry
// =============================================================================

#[test]
fn set_then_get_returns_equal_value() {
    let clock = ManualClock::at_millis(1_700_000_000_000);
    let (cache, _) = store(&clock);

    let value = json!({
        "title": "Pad Thai",
        "ingredients": [{"name": "noodles", "quantity": 200}],
        "calories": 612.5,
        "tags": ["thai", "wok"],
        "vegan": false,
    });
    cache.set("recipe_detail_1", &value);

    assert_eq!(cache.get("recipe_detail_1"), Some(value));
}

#[test]
fn expired_entry_is_absent_and_removed() {
    let clock = ManualClock::at_millis(1_700_000_000_000);
    let (cache, storage) = store(&clock);

    cache.set("recipes_list_p1_l10", &json!([1, 2, 3]));
    clock.advance(7 * DAY - Duration::from_millis(1));
    assert!(cache.get("recipes_list_p1_l10").is_some());

    clock.advance(Duration::from_millis(2));
    assert_eq!(cache.get("recipes_list_p1_l10"), None);
    assert_eq!(storage.get_item("culinary_sim_recipes_list_p1_l10"), None);
}

#[test]
fn custom_ttl_applies() {
    let clock = ManualClock::at_millis(0);
    let storage = Arc::new(MemoryStorage::new());
    let cache = store_with(storage, &clock, CacheConfig::new().ttl(DAY));

    cache.set("k", &"v");
    clock.advance(DAY + Duration::from_secs(1));
    assert_eq!(cache.get("k"), None);
}

#[test]
fn no_expiry_keeps_entries() {
    let clock = ManualClock::at_millis(0);
    let storage = Arc::new(MemoryStorage::new());
    let cache = store_with(storage, &clock, CacheConfig::new().no_expiry());

    cache.set("k", &"v");
    clock.advance(365 * DAY);
    assert_eq!(cache.get("k"), Some(json!("v")));
}

#[test]
fn corrupt_entry_is_a_miss() {
    let clock = ManualClock::at_millis(0);
    let (cache, storage) = store(&clock);

    storage.set_item("culinary_sim_broken", "{not json").unwrap();
    assert_eq!(cache.get("broken"), None);

    storage
        .set_item("culinary_sim_no_timestamp", r#"{"data": 1}"#)
        .unwrap();
    assert_eq!(cache.get("no_timestamp"), None);
}

#[test]
fn overwrite_refreshes_timestamp() {
    let clock = ManualClock::at_millis(0);
    let (cache, _) = store(&clock);

    cache.set("k", &1);
    clock.advance(6 * DAY);
    cache.set("k", &2);
    clock.advance(6 * DAY);
    assert_eq!(cache.get("k"), Some(json!(2)));
}

// =============================================================================
// Quota handling
// =============================================================================

#[test]
fn quota_failure_purges_namespace_and_retries() {
    let clock = ManualClock::at_millis(0);
    let storage = Arc::new(MemoryStorage::with_quota(400));
    let cache = store_with(storage.clone(), &clock, CacheConfig::default());

    cache.set("a", &"x".repeat(100));
    cache.set("b", &"y".repeat(100));
    assert_eq!(cache.stats().entries, 2);

    // Does not fit next to a and b, fits alone.
    cache.set("c", &"z".repeat(200));

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("c"), Some(json!("z".repeat(200))));
}

#[test]
fn write_larger_than_quota_is_dropped() {
    let clock = ManualClock::at_millis(0);
    let storage = Arc::new(MemoryStorage::with_quota(64));
    let cache = store_with(storage.clone(), &clock, CacheConfig::default());

    cache.set("huge", &"x".repeat(1_000));

    assert_eq!(cache.get("huge"), None);
    assert_eq!(storage.used_bytes(), 0);
}

#[test]
fn purge_keeps_foreign_keys() {
    let clock = ManualClock::at_millis(0);
    let storage = Arc::new(MemoryStorage::with_quota(600));
    storage.set_item("vault_contents", "[\"egg\"]").unwrap();
    let cache = store_with(storage.clone(), &clock, CacheConfig::default());

    cache.set("a", &"x".repeat(300));
    // Forces a purge of the namespace.
    cache.set("b", &"y".repeat(300));

    assert_eq!(storage.get_item("vault_contents").as_deref(), Some("[\"egg\"]"));
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(json!("y".repeat(300))));
}

// =============================================================================
// Clear and stats
// =============================================================================

#[test]
fn clear_only_touches_namespace() {
    let clock = ManualClock::at_millis(0);
    let (cache, storage) = store(&clock);

    storage.set_item("simulation_history", "[]").unwrap();
    cache.set("a", &1);
    cache.set("b", &2);

    assert_eq!(cache.clear(), 2);
    assert_eq!(cache.get("a"), None);
    assert_eq!(storage.get_item("simulation_history").as_deref(), Some("[]"));
}

#[test]
fn stats_count_only_namespaced_entries() {
    let clock = ManualClock::at_millis(0);
    let (cache, storage) = store(&clock);

    storage.set_item("pending_import", "something").unwrap();
    cache.set("a", &1);

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    let raw = storage.get_item("culinary_sim_a").unwrap();
    assert_eq!(stats.size_bytes, raw.len());
}

#[test]
fn separate_prefixes_do_not_collide() {
    let clock = ManualClock::at_millis(0);
    let storage = Arc::new(MemoryStorage::new());
    let lab = store_with(storage.clone(), &clock, CacheConfig::new().prefix("lab_"));
    let sim = store_with(storage.clone(), &clock, CacheConfig::default());

    lab.set("k", &"lab");
    sim.set("k", &"sim");
    lab.clear();

    assert_eq!(lab.get("k"), None);
    assert_eq!(sim.get("k"), Some(json!("sim")));
}
