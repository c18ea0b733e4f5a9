//! Event kinds and the event value handed to listeners.

use std::fmt;
use std::str::FromStr;

use researchopia_token::now_millis;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::EventError;

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// The closed set of authentication lifecycle events.
///
/// Serialized in `SCREAMING_SNAKE_CASE` (`"SIGNED_IN"`), which is also what
/// [`Display`](fmt::Display) prints and [`FromStr`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A session was established.
    SignedIn,
    /// The session was ended on purpose.
    SignedOut,
    /// The access token was refreshed and the session extended.
    SessionRefreshed,
    /// The session is no longer usable and could not be refreshed.
    SessionExpired,
    /// A new access token replaced the old one.
    TokenUpdated,
    /// The user's profile snapshot changed.
    UserUpdated,
}

impl EventType {
    /// Every event kind, in declaration order.
    pub const ALL: [EventType; 6] = [
        Self::SignedIn,
        Self::SignedOut,
        Self::SessionRefreshed,
        Self::SessionExpired,
        Self::TokenUpdated,
        Self::UserUpdated,
    ];

    /// The wire name, e.g. `"SESSION_EXPIRED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::SessionRefreshed => "SESSION_REFRESHED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::TokenUpdated => "TOKEN_UPDATED",
            Self::UserUpdated => "USER_UPDATED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EventError::UnknownEventType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// AuthEvent
// ---------------------------------------------------------------------------

/// One occurrence of an event, as delivered to listeners.
///
/// Built fresh on every [`emit`](crate::EventDispatcher::emit); never stored
/// by the dispatcher.
///
/// ```json
/// { "type": "SIGNED_IN", "data": { "userId": "u1" }, "timestamp": 1700000000000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Free-form payload supplied by whoever emitted the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// When the event was emitted, in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl AuthEvent {
    /// Creates an event stamped with the current wall-clock time.
    pub fn new(event_type: EventType, data: Option<Value>) -> Self {
        Self {
            event_type,
            data,
            timestamp: now_millis(),
        }
    }

    /// Looks up `name` in an object payload.
    ///
    /// Returns `None` if there is no payload, it isn't an object, or the
    /// field is missing.
    pub fn data_field(&self, name: &str) -> Option<&Value> {
        self.data.as_ref()?.get(name)
    }
}
