//! Wall-clock helper shared by the token, session and event layers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Expiry is a comparison against real time, so this deliberately uses
/// `SystemTime` rather than the monotonic `Instant`: token `exp` claims and
/// persisted `expires_at` values are absolute timestamps produced by other
/// machines.
///
/// A clock set before 1970 reads as `0`.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
