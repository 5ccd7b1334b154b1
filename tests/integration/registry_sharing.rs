//! Integration test: registry-mediated store sharing.
//!
//! Tests the complete lifecycle:
//! 1. Look up a store through the registry with defaults
//! 2. Init and persist through the shared handle
//! 3. Second lookup returns the same live instance
//! 4. Mutations ripple to every handle without re-reading the file
//! 5. Distinct paths stay independent

use dotconf::registry::StoreRegistry;
use serde_json::json;
use std::sync::Arc;

#[test]
fn registry_shares_one_store_per_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("app/cfg.json");
    let mut registry = StoreRegistry::new();

    // ── Step 1: Look up with defaults ───────────────────────────────────
    let handle = registry.store_with_defaults(&path, json!({"port": 8080}));
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(&path));

    // ── Step 2: Init and persist through the handle ─────────────────────
    handle
        .lock()
        .unwrap()
        .init(true)
        .expect("init should materialize the file");
    assert!(path.exists());

    // ── Step 3: Second lookup returns the same live instance ────────────
    let second = registry.store_with_defaults(&path, json!({"port": 1}));
    assert!(Arc::ptr_eq(&handle, &second), "same path, same store");
    assert_eq!(
        second.lock().unwrap().get("port").cloned(),
        Some(json!(8080)),
        "defaults from the second lookup are ignored"
    );
    assert_eq!(registry.len(), 1, "cache hit registers nothing new");

    // ── Step 4: Mutations ripple to every handle ────────────────────────
    handle.lock().unwrap().set("port", 9090);
    assert_eq!(
        second.lock().unwrap().get("port").cloned(),
        Some(json!(9090))
    );

    // The file is only rewritten on save.
    let raw = std::fs::read_to_string(&path).expect("read backing file");
    assert_eq!(raw, r#"{"port":8080}"#);
    second.lock().unwrap().save().expect("save through handle");
    let raw = std::fs::read_to_string(&path).expect("read backing file");
    assert_eq!(raw, r#"{"port":9090}"#);

    // ── Step 5: Distinct paths stay independent ─────────────────────────
    let other = registry.store(dir.path().join("app/other.json"));
    other.lock().unwrap().set("port", 1234);
    assert_eq!(
        handle.lock().unwrap().get("port").cloned(),
        Some(json!(9090)),
        "stores at different paths never share state"
    );
    assert_eq!(registry.len(), 2);
}

#[test]
fn registry_handles_outlive_the_registry() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("cfg.json");

    let handle = {
        let mut registry = StoreRegistry::new();
        registry.store_with_defaults(&path, json!({"mode": "standalone"}))
    };

    // The registry is gone; the handle still owns a live store.
    let mut store = handle.lock().unwrap();
    store.init(true).expect("init after registry dropped");
    assert_eq!(store.get("mode"), Some(&json!("standalone")));
    assert!(path.exists());
}

#[test]
fn registry_default_construction() {
    let registry = StoreRegistry::default();
    assert!(registry.is_empty());
    assert!(registry.paths().is_empty());
}
