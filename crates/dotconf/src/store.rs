//! Persisted JSON configuration store.
//!
//! A [`ConfigStore`] owns a file path, optional default values, and the live
//! key-value state loaded from that file. State is addressed with dotted
//! paths (`"server.port"`), mutated in memory, and written back explicitly
//! with [`save`](ConfigStore::save).
//!
//! File format (the document IS the exposed state, nothing else is written):
//! ```json
//! {
//!     "port": 9090,
//!     "server": { "host": "127.0.0.1" }
//! }
//! ```
//!
//! Loading is resilient: a missing, unreadable, or malformed backing file
//! leaves the in-memory state untouched (typically the defaults) and logs
//! the failure instead of surfacing it. Writes always surface their errors.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::keypath;

// ── Reserved keys ─────────────────────────────────────────────────────────────

/// Prefix marking a top-level key as reserved for internal bookkeeping.
///
/// Documents written by older revisions of this format carried metadata
/// (path, defaults, flags) next to the data under `__`-prefixed names. Keys
/// with this prefix are never readable, writable, removable, or serialized.
pub const RESERVED_PREFIX: &str = "__";

/// True when `key` may be read, written, or removed through a store.
///
/// Only the leading segment of a dotted key can be reserved; nested segments
/// may use any name.
pub fn is_valid_key(key: &str) -> bool {
    !key.starts_with(RESERVED_PREFIX)
}

// ── ConfigStore ───────────────────────────────────────────────────────────────

/// Persisted key-value configuration backed by a single JSON file.
///
/// Construction never touches the filesystem; call
/// [`init`](ConfigStore::init) (or [`load`](ConfigStore::load)) to read or
/// materialize the backing file, and [`save`](ConfigStore::save) to persist
/// changes. The store is safe for single-process use; concurrent writes from
/// multiple processes are not coordinated.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// Location of the backing JSON document.
    path: PathBuf,
    /// Fallback values merged in whenever a document or object is applied.
    defaults: Map<String, Value>,
    /// Live exposed state. Serialization emits exactly this map.
    data: Map<String, Value>,
    /// Set once `init` has completed its first load.
    initialized: bool,
    /// When true, `save` and `to_json` emit tab-indented JSON.
    pretty: bool,
}

impl ConfigStore {
    /// Create a store with no defaults.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_defaults(path, Value::Null)
    }

    /// Create a store whose state starts out as `defaults`.
    ///
    /// `defaults` should be a JSON object; any other value (including
    /// `Value::Null`) means "no defaults". The defaults are fixed for the
    /// lifetime of the store and re-merged by every
    /// [`apply`](ConfigStore::apply). The filesystem is not touched.
    pub fn with_defaults(path: impl Into<PathBuf>, defaults: Value) -> Self {
        let defaults = match defaults {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        let mut store = Self {
            path: path.into(),
            defaults,
            data: Map::new(),
            initialized: false,
            pretty: false,
        };
        let seed = store.defaults.clone();
        store.apply(Value::Object(seed));
        store
    }

    /// Idempotent entry point: load-or-create the backing file once.
    ///
    /// The first call re-applies the defaults, runs
    /// [`load`](ConfigStore::load) with the given `create` flag, and marks
    /// the store initialized; further calls do nothing. After a successful
    /// return the state reflects the on-disk content merged over the
    /// defaults (or just the defaults, if the file is absent and `create` is
    /// false).
    ///
    /// # Errors
    ///
    /// Propagates write failures from the materializing save when `create`
    /// is true and the file did not exist.
    pub fn init(&mut self, create: bool) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        let seed = self.defaults.clone();
        self.apply(Value::Object(seed));
        self.load(create)?;
        self.initialized = true;
        Ok(())
    }

    /// Read the backing file and merge its content onto the current state.
    ///
    /// When the file does not exist and `create` is true,
    /// [`save`](ConfigStore::save) materializes it first, so it starts out
    /// holding the current state (typically the defaults). Read and parse
    /// failures are logged and swallowed, leaving the state as it was; a
    /// corrupted config file must not take the host process down with it.
    ///
    /// # Errors
    ///
    /// Only write failures from the materializing save surface; read-side
    /// problems are absorbed here by design.
    pub fn load(&mut self, create: bool) -> Result<()> {
        let mut present = self.exists();

        if !present && create && self.has_backing_path() {
            self.save()?;
            present = true;
        }

        if present {
            match self.read_document() {
                Ok(document) => self.apply(Value::Object(document)),
                Err(err) => {
                    log::error!(
                        "failed to load config file {}: {err}",
                        self.path.display()
                    );
                }
            }
        }

        Ok(())
    }

    /// Look up the value at a dotted `key`.
    ///
    /// Returns `None` for reserved keys and for paths that do not resolve.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if !is_valid_key(key) {
            return None;
        }
        keypath::get(&self.data, key)
    }

    /// Write `value` at a dotted `key`, creating intermediate objects as
    /// needed. Reserved keys are ignored.
    ///
    /// The change is in-memory only until [`save`](ConfigStore::save).
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        if !is_valid_key(key) {
            return;
        }
        keypath::set(&mut self.data, key, value.into());
    }

    /// Delete the value at a dotted `key`.
    ///
    /// Reserved keys and paths that do not resolve are ignored.
    pub fn remove(&mut self, key: &str) {
        if !is_valid_key(key) {
            return;
        }
        keypath::remove(&mut self.data, key);
    }

    /// Remove every top-level key from the state.
    ///
    /// Not recursive, and the defaults are not re-applied afterwards; the
    /// store stays empty until the next [`apply`](ConfigStore::apply) or
    /// [`load`](ConfigStore::load).
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Merge `object` over the defaults, then assign the result onto state.
    ///
    /// Defaults fill only the keys missing from `object`; every key of the
    /// merged result then overwrites the corresponding top-level state key.
    /// Reserved keys are skipped. Non-object values (including
    /// `Value::Null`) are ignored entirely.
    ///
    /// Called internally by construction and [`load`](ConfigStore::load);
    /// public for manual re-merges.
    pub fn apply(&mut self, object: Value) {
        let mut merged = match object {
            Value::Object(object) => object,
            _ => return,
        };

        for (key, value) in &self.defaults {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }

        for (key, value) in merged {
            if is_valid_key(&key) {
                self.data.insert(key, value);
            }
        }
    }

    /// Serialize the state and write it to the backing path.
    ///
    /// Missing parent directories are created first. The write goes through
    /// a sibling temp file renamed into place, so a crash mid-save leaves
    /// the previous document intact. Output is compact or tab-indented per
    /// [`set_pretty`](ConfigStore::set_pretty).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory or file cannot be
    /// written. Write failures always surface; they are never swallowed.
    pub fn save(&self) -> Result<()> {
        self.save_with(self.pretty)
    }

    /// Like [`save`](ConfigStore::save), but with an explicit one-shot
    /// formatting choice that ignores the store's pretty flag.
    ///
    /// # Errors
    ///
    /// Same surface as [`save`](ConfigStore::save).
    pub fn save_with(&self, pretty: bool) -> Result<()> {
        let json = self.to_json_with(pretty)?;
        self.write_atomic(json.as_bytes())
    }

    /// Render the state as a JSON string without touching disk.
    ///
    /// Compact by default; indented with one tab per level when the pretty
    /// flag is on.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if a value cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        self.to_json_with(self.pretty)
    }

    /// Like [`to_json`](ConfigStore::to_json), but with an explicit one-shot
    /// formatting choice that ignores the store's pretty flag.
    ///
    /// # Errors
    ///
    /// Same surface as [`to_json`](ConfigStore::to_json).
    pub fn to_json_with(&self, pretty: bool) -> Result<String> {
        if pretty {
            let mut out = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
            let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
            self.data.serialize(&mut ser)?;
            Ok(String::from_utf8(out).expect("serde_json emits valid UTF-8"))
        } else {
            Ok(serde_json::to_string(&self.data)?)
        }
    }

    /// Deep plain copy of the exposed state.
    pub fn to_map(&self) -> Map<String, Value> {
        self.data.clone()
    }

    /// Deserialize the exposed state into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] when the state does not match `T`.
    pub fn to_object<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    /// True when the store points at a real, present file.
    ///
    /// The conventional path `"."` means "no backing file" and always
    /// reports false, as does an empty path.
    pub fn exists(&self) -> bool {
        self.has_backing_path() && self.path.exists()
    }

    /// Point the store at `path` and immediately load from it.
    ///
    /// The new file's content merges over the existing in-memory state;
    /// keys not present in the new file survive.
    ///
    /// # Errors
    ///
    /// Same surface as [`load`](ConfigStore::load).
    pub fn set_path(&mut self, path: impl Into<PathBuf>, create: bool) -> Result<()> {
        self.path = path.into();
        self.load(create)
    }

    /// Choose between compact (false) and tab-indented (true) output for
    /// [`save`](ConfigStore::save) and [`to_json`](ConfigStore::to_json).
    pub fn set_pretty(&mut self, pretty: bool) {
        self.pretty = pretty;
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Location of the backing JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The defaults supplied at construction.
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// True once [`init`](ConfigStore::init) has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True when output is tab-indented.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Number of top-level keys currently in the state.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the state holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over the top-level keys currently in the state.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// True when `path` names a real file location rather than the `"."`
    /// no-file convention or an empty path.
    fn has_backing_path(&self) -> bool {
        !self.path.as_os_str().is_empty() && self.path != Path::new(".")
    }

    /// Read and parse the backing file into a top-level object.
    fn read_document(&self) -> Result<Map<String, Value>> {
        let contents = std::fs::read(&self.path)?;
        let value: Value = serde_json::from_slice(&contents)?;
        match value {
            Value::Object(object) => Ok(object),
            other => Err(StoreError::InvalidDocument(format!(
                "{}: expected a top-level JSON object, found {}",
                self.path.display(),
                json_type_name(&other),
            ))),
        }
    }

    /// Write `contents` to the backing path via a sibling temp file.
    fn write_atomic(&self, contents: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, contents)?;
        if let Err(err) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }
}

/// Human-readable name of a JSON value's type for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
