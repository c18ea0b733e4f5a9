//! Error types for the session layer.
//!
//! None of these escape the plain operations on
//! [`SessionManager`](crate::SessionManager): a corrupted record reads as
//! "no session", a failed write is logged and dropped. They surface only
//! through the `try_*` methods, for callers that want to know why.

/// Errors raised by a [`SessionStore`](crate::SessionStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The storage directory could not be created or opened.
    #[error("cannot open session store directory {}: {source}", dir.display())]
    OpenDir {
        dir: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key can't be used by this backend (e.g. it would escape the
    /// storage directory).
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Errors that can occur while persisting or reading a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session could not be serialized.
    #[error("session encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The persisted record is not a valid session (corrupted, truncated,
    /// missing fields, wrong types).
    #[error("session decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
