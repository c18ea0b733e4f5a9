//! Unified error type for the Researchopia auth core.

use researchopia_events::EventError;
use researchopia_session::{SessionError, StoreError};
use researchopia_token::TokenError;

/// Top-level error that wraps all crate-specific errors.
///
/// Code built on the `researchopia-auth` meta-crate handles this one type
/// instead of importing errors from each layer. Every variant has a
/// `#[from]`, so `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A token could not be decoded.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A session could not be persisted or read back.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A storage backend failed outside of a session operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An event name could not be recognised.
    #[error(transparent)]
    Event(#[from] EventError),

    /// An [`AuthConfig`](crate::AuthConfig) document was not valid JSON or
    /// had the wrong shape.
    #[error("invalid auth config: {0}")]
    Config(#[source] serde_json::Error),
}
