//! Top-level configuration for an auth controller built on this core.

use std::time::Duration;

use researchopia_session::SessionConfig;
use researchopia_token::DEFAULT_EXPIRY_THRESHOLD_MS;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Log directive used when neither the config nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// How often a controller re-checks whether the token needs refreshing.
pub const DEFAULT_REFRESH_CHECK_INTERVAL_MS: u64 = 60_000;

/// Everything a host application tunes about the auth core.
///
/// Every field has a default, so `{}` is a valid config document and a
/// file only needs to list what it overrides:
///
/// ```json
/// { "session": { "storage_key": "staging_session" }, "refresh_threshold_ms": 120000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where the session record is persisted.
    pub session: SessionConfig,

    /// A token with this many milliseconds (or fewer) left counts as
    /// expiring soon and should be refreshed.
    pub refresh_threshold_ms: i64,

    /// How often the controller polls token expiry. `0` is treated as 1 ms.
    pub refresh_check_interval_ms: u64,

    /// `tracing` filter directive passed to [`logging::init`](crate::logging::init).
    pub log_filter: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            refresh_threshold_ms: DEFAULT_EXPIRY_THRESHOLD_MS,
            refresh_check_interval_ms: DEFAULT_REFRESH_CHECK_INTERVAL_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AuthConfig {
    /// Parses a JSON config document, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        serde_json::from_str(json).map_err(AuthError::Config)
    }

    /// The polling period as a [`Duration`], never zero.
    pub fn refresh_check_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_check_interval_ms.max(1))
    }
}
