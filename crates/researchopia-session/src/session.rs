//! Session types: the persisted record of who is signed in and until when.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key the session record lives under unless configured otherwise.
///
/// Anything else reading the same store (a companion browser extension, for
/// instance) must look under this key.
pub const DEFAULT_STORAGE_KEY: &str = "researchopia_session";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`SessionManager`](crate::SessionManager).
///
/// `#[serde(default)]` lets a config file specify only the fields it cares
/// about; the rest come from [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// The single key the whole session record is stored under.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A display snapshot of the signed-in user.
///
/// Denormalized from the identity provider's response at sign-in time. It
/// is not checked against the token's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// ISO-8601 timestamp, kept as the provider sent it.
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The persisted authentication state.
///
/// Serialized as a flat JSON object:
///
/// ```json
/// {
///   "access_token": "header.payload.signature",
///   "refresh_token": "opaque",
///   "expires_at": 1700000000000,
///   "user": { "id": "...", "email": "...", "display_name": "...", "created_at": "..." }
/// }
/// ```
///
/// Every field is required on read. A record missing any of them is
/// treated as no session at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token attached to requests.
    pub access_token: String,

    /// Opaque credential for obtaining a new access token. Never parsed
    /// here.
    pub refresh_token: String,

    /// When this session stops being usable, in **milliseconds** since the
    /// Unix epoch.
    ///
    /// This is the session's own clock and is what
    /// [`SessionManager::is_session_valid`](crate::SessionManager::is_session_valid)
    /// checks. It is not reconciled with the access token's `exp` claim.
    pub expires_at: i64,

    pub user: User,
}

impl Session {
    /// Returns `true` if the session is no longer usable at `now_ms`.
    ///
    /// A session is valid strictly before `expires_at`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at <= now_ms
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where the persisted session stands right now.
///
/// ```text
///   Absent ──save(future)──→ Valid ──(time passes)──→ Expired
///     ↑                                                  │
///     └─────────────────────── clear ────────────────────┘
/// ```
///
/// Saving a record whose `expires_at` is already past lands directly in
/// `Expired`. `clear` works from any state.
///
/// There is no timer: `Valid → Expired` happens silently as the clock moves
/// and is only observed when someone asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No record, or a record that could not be decoded.
    Absent,
    /// A record whose `expires_at` is still in the future.
    Valid,
    /// A record whose `expires_at` has passed.
    Expired,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Valid => write!(f, "Valid"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}
