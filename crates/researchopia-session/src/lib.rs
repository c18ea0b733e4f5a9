//! Persisted session management for Researchopia.
//!
//! This crate owns the one record that says who is signed in:
//!
//! 1. **Records** ([`Session`], [`User`]): what gets persisted, and its
//!    JSON shape.
//! 2. **Storage** ([`SessionStore`] trait, [`MemoryStore`], [`FileStore`]):
//!    where it gets persisted.
//! 3. **Management** ([`SessionManager`]): save, load, clear, validity,
//!    expiry refresh, all fail-soft.
//!
//! # How it fits in the stack
//!
//! ```text
//! AuthController (external) ← decides when to sign in, refresh, sign out
//!     ↕
//! Session Layer (this crate) ← persists and validates the session record
//!     ↕
//! Token Layer (below)        ← provides the wall clock and token checks
//! ```
//!
//! # Example
//!
//! ```rust
//! use researchopia_session::{MemoryStore, Session, SessionManager, User};
//! use researchopia_token::now_millis;
//!
//! let mut sessions = SessionManager::new(MemoryStore::new());
//! assert!(!sessions.is_session_valid());
//!
//! sessions.save_session(&Session {
//!     access_token: "header.payload.signature".into(),
//!     refresh_token: "refresh".into(),
//!     expires_at: now_millis() + 60 * 60 * 1000,
//!     user: User {
//!         id: "u1".into(),
//!         email: "u1@example.org".into(),
//!         display_name: "User One".into(),
//!         created_at: "2024-01-01T00:00:00Z".into(),
//!     },
//! });
//!
//! assert!(sessions.is_session_valid());
//! assert_eq!(sessions.get_access_token().as_deref(), Some("header.payload.signature"));
//! ```

mod error;
mod manager;
mod session;
mod store;

pub use error::{SessionError, StoreError};
pub use manager::SessionManager;
pub use session::{DEFAULT_STORAGE_KEY, Session, SessionConfig, SessionState, User};
pub use store::{FileStore, MemoryStore, SessionStore};
