//! # Researchopia Auth
//!
//! Client-side authentication session core for Researchopia.
//!
//! The three layers live in their own crates and are re-exported here, so
//! an application depends on this one crate and imports from [`prelude`]:
//!
//! - **Token** ([`token`]): decode bearer token claims, answer expiry
//!   questions fail-closed.
//! - **Session** ([`session`]): persist one session record in a key-value
//!   store, read it back fail-soft.
//! - **Events** ([`events`]): notify listeners of sign-in, sign-out and
//!   refresh.
//!
//! On top of those this crate adds a unified [`AuthError`], an
//! [`AuthConfig`] and a [`logging::init`] helper.
//!
//! The core never performs a sign-in, refresh, or network call. That is the
//! job of an auth controller built on top: it talks to the identity
//! provider, writes through [`SessionManager`](session::SessionManager), and
//! emits on an [`EventDispatcher`](events::EventDispatcher).
//!
//! ## Quick Start
//!
//! ```rust
//! use researchopia_auth::prelude::*;
//! use serde_json::json;
//!
//! let config = AuthConfig::from_json(r#"{ "refresh_threshold_ms": 120000 }"#)?;
//! let mut sessions = SessionManager::with_config(MemoryStore::new(), config.session.clone());
//! let events = EventDispatcher::new();
//!
//! events.on(EventType::SignedIn, listener(|event| {
//!     assert_eq!(event.data_field("userId").unwrap(), "u1");
//! }));
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
//! events.emit(EventType::SignedIn, Some(json!({ "userId": "u1" })));
//!
//! assert!(sessions.is_session_valid());
//! # Ok::<(), AuthError>(())
//! ```

mod config;
mod error;
pub mod logging;

pub use config::{AuthConfig, DEFAULT_LOG_FILTER, DEFAULT_REFRESH_CHECK_INTERVAL_MS};
pub use error::AuthError;

pub use researchopia_events as events;
pub use researchopia_session as session;
pub use researchopia_token as token;

pub mod prelude {
    pub use crate::{AuthConfig, AuthError};

    pub use researchopia_events::{
        AuthEvent, EventDispatcher, EventType, Listener, Subscription, listener,
    };
    pub use researchopia_session::{
        FileStore, MemoryStore, Session, SessionConfig, SessionManager, SessionState,
        SessionStore, User,
    };
    pub use researchopia_token::{
        Claims, get_token_expiry, is_token_expired, is_token_expiring_soon,
        is_token_expiring_soon_default, now_millis, parse_jwt, validate_token_format,
    };
}
