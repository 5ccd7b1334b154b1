//! Scale test: large key counts, deep paths, and many registered stores.
//!
//! Validates that store operations stay correct at volume.

use dotconf::registry::StoreRegistry;
use dotconf::store::ConfigStore;
use serde_json::json;

#[test]
fn stress_10k_top_level_keys_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("big.json");

    let mut store = ConfigStore::new(&path);
    for i in 0..10_000u64 {
        store.set(&format!("key_{i}"), i);
    }
    assert_eq!(store.len(), 10_000);
    store.save().expect("save 10k keys");

    let mut reopened = ConfigStore::new(&path);
    reopened.init(false).expect("reopen 10k keys");
    assert_eq!(reopened.len(), 10_000);
    assert_eq!(reopened.get("key_0"), Some(&json!(0)));
    assert_eq!(reopened.get("key_9999"), Some(&json!(9999)));
}

#[test]
fn stress_deep_dotted_path() {
    let segments: Vec<String> = (0..64).map(|i| format!("n{i}")).collect();
    let key = segments.join(".");

    let mut store = ConfigStore::new("/tmp/nowhere/deep.json");
    store.set(&key, "leaf");
    assert_eq!(store.get(&key), Some(&json!("leaf")));

    // Every prefix along the way is a real object.
    let prefix = segments[..32].join(".");
    assert!(store.get(&prefix).is_some_and(serde_json::Value::is_object));

    store.remove(&key);
    assert_eq!(store.get(&key), None);
    assert!(
        store.get(&prefix).is_some(),
        "removing the leaf keeps the intermediate objects"
    );
}

#[test]
fn stress_1k_stores_one_registry() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut registry = StoreRegistry::new();

    for i in 0..1_000 {
        let handle = registry.store(dir.path().join(format!("cfg_{i}.json")));
        handle.lock().unwrap().set("id", i as u64);
    }
    assert_eq!(registry.len(), 1_000);

    // Every lookup hits the cached instance with its own state intact.
    for i in 0..1_000 {
        let handle = registry.store(dir.path().join(format!("cfg_{i}.json")));
        assert_eq!(
            handle.lock().unwrap().get("id").cloned(),
            Some(json!(i as u64)),
            "store {i} kept its value"
        );
    }
    assert_eq!(registry.len(), 1_000, "second pass registered nothing new");
}

#[test]
fn stress_repeated_save_load_cycles() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("cycle.json");

    let mut store = ConfigStore::with_defaults(&path, json!({"generation": 0}));
    store.init(true).expect("initial materialization");

    for generation in 1..=100u64 {
        store.set("generation", generation);
        store.set(&format!("g{generation}.written"), true);
        store.save().expect("save cycle");
        store.load(false).expect("load cycle");
        assert_eq!(store.get("generation"), Some(&json!(generation)));
    }

    let mut reopened = ConfigStore::new(&path);
    reopened.init(false).expect("reopen after cycles");
    assert_eq!(reopened.get("generation"), Some(&json!(100)));
    assert_eq!(reopened.get("g1.written"), Some(&json!(true)));
    assert_eq!(reopened.get("g100.written"), Some(&json!(true)));
    assert_eq!(reopened.len(), 101);
}
