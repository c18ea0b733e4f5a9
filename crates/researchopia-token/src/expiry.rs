//! Expiry predicates over bearer tokens.
//!
//! Every predicate that answers "is this token usable?" is **fail-closed**:
//! if the token can't be decoded, or carries no `exp`, it is reported as
//! expired. A false "valid" would let a dead credential through; a false
//! "expired" only costs an extra refresh.
//!
//! [`get_token_expiry`] is the exception. It answers "when does this expire,
//! if we know?", so an unreadable token gives `None` instead of a sentinel.
//!
//! Each predicate has an `_at` twin that takes "now" explicitly. The plain
//! versions read the wall clock on every call; nothing is cached.

use crate::{now_millis, parse_jwt};

/// Default window before expiry in which a token counts as "expiring soon":
/// five minutes.
pub const DEFAULT_EXPIRY_THRESHOLD_MS: i64 = 5 * 60 * 1000;

/// Returns `true` if the token is expired, unreadable, or has no `exp`.
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, now_millis())
}

/// [`is_token_expired`] against an explicit clock reading (ms since epoch).
pub fn is_token_expired_at(token: &str, now_ms: i64) -> bool {
    match get_token_expiry(token) {
        Some(expires_at_ms) => expires_at_ms <= now_ms,
        None => true,
    }
}

/// The token's `exp` claim in milliseconds, or `None` if the token is
/// unreadable or has no `exp`.
pub fn get_token_expiry(token: &str) -> Option<i64> {
    parse_jwt(token)?.expires_at_ms()
}

/// Returns `true` if the token expires within `threshold_ms` of now (or
/// already has, or can't be read).
///
/// The threshold is per call. Raising it can only turn `false` into `true`.
pub fn is_token_expiring_soon(token: &str, threshold_ms: i64) -> bool {
    is_token_expiring_soon_at(token, threshold_ms, now_millis())
}

/// [`is_token_expiring_soon`] with [`DEFAULT_EXPIRY_THRESHOLD_MS`].
pub fn is_token_expiring_soon_default(token: &str) -> bool {
    is_token_expiring_soon(token, DEFAULT_EXPIRY_THRESHOLD_MS)
}

/// [`is_token_expiring_soon`] against an explicit clock reading.
pub fn is_token_expiring_soon_at(token: &str, threshold_ms: i64, now_ms: i64) -> bool {
    match get_token_expiry(token) {
        Some(expires_at_ms) => {
            expires_at_ms <= now_ms || expires_at_ms.saturating_sub(now_ms) <= threshold_ms
        }
        None => true,
    }
}
