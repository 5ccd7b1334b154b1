//! dotconf — persisted JSON key-value configuration stores.
//!
//! Provides a file-backed [`ConfigStore`] with dotted-path get/set/remove
//! over a JSON document, default-value merging, resilient loading (a broken
//! config file degrades to defaults instead of failing), and a
//! [`StoreRegistry`] that shares one live store per path across a process.

pub mod error;
pub mod keypath;
pub mod registry;
pub mod store;

// Re-export primary types
pub use error::{Result, StoreError};
pub use registry::{SharedStore, StoreRegistry};
pub use store::{is_valid_key, ConfigStore, RESERVED_PREFIX};
