//! Error types for dotconf.
//!
//! All errors are strongly typed and propagated without panicking.
//! Read-side failures during [`load`](crate::store::ConfigStore::load) are
//! logged and swallowed by the store itself; everything else surfaces here.

/// Store error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, StoreError>;
