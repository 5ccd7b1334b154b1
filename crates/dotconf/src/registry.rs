//! Process-wide lookup of configuration stores by path.
//!
//! A [`StoreRegistry`] caches one live [`ConfigStore`] per backing path and
//! hands it out behind an `Arc<Mutex<_>>` handle, so every caller asking for
//! the same path shares the same mutable state. Mutations made through any
//! handle are immediately visible to every other holder, which is the
//! intended "single source of truth per path" semantic.
//!
//! The registry is an explicit value, not a global: construct one where the
//! process wires things up and pass it by reference to whatever needs store
//! lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::store::ConfigStore;

/// Shared handle to a registered [`ConfigStore`].
pub type SharedStore = Arc<Mutex<ConfigStore>>;

// ── StoreRegistry ─────────────────────────────────────────────────────────────

/// Cache mapping each backing path to a single live [`ConfigStore`].
///
/// Repeated lookups with the same path return handles to the same store
/// instance; a store lives for as long as the registry (or any outstanding
/// handle) keeps it alive. There is no removal.
pub struct StoreRegistry {
    /// Primary store: backing path → shared store handle.
    stores: HashMap<PathBuf, SharedStore>,
}

impl StoreRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            stores: HashMap::new(),
        }
    }

    /// Return the store registered for `path`, constructing it without
    /// defaults on first lookup.
    ///
    /// The store is returned as constructed; call
    /// [`init`](ConfigStore::init) through the handle to touch the backing
    /// file.
    pub fn store(&mut self, path: impl Into<PathBuf>) -> SharedStore {
        self.store_with_defaults(path, Value::Null)
    }

    /// Return the store registered for `path`, constructing it with
    /// `defaults` on first lookup.
    ///
    /// `defaults` only matter when this call constructs the store; a lookup
    /// that hits the cache returns the existing instance unchanged and the
    /// supplied defaults are ignored (first registration wins).
    pub fn store_with_defaults(&mut self, path: impl Into<PathBuf>, defaults: Value) -> SharedStore {
        let path = path.into();
        if let Some(existing) = self.stores.get(&path) {
            return Arc::clone(existing);
        }

        let store = Arc::new(Mutex::new(ConfigStore::with_defaults(
            path.clone(),
            defaults,
        )));
        self.stores.insert(path, Arc::clone(&store));
        store
    }

    /// Return `true` when a store is registered for `path`.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.stores.contains_key(path.as_ref())
    }

    /// Return every registered backing path, in unspecified order.
    pub fn paths(&self) -> Vec<&Path> {
        self.stores.keys().map(PathBuf::as_path).collect()
    }

    /// Return the total number of registered stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Return `true` when the registry holds no stores.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
