//! The decoded payload of a bearer token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims decoded from the middle segment of a bearer token.
///
/// Identity providers put all sorts of things in a token payload (`sub`,
/// `email`, `role`, `aud`, custom app metadata...). The only claim this
/// crate interprets is `exp`, so it gets its own field and everything else
/// lands in `extra` untouched.
///
/// `#[serde(flatten)]` collects every key that isn't `exp` into the map,
/// so a payload like `{"exp": 1700000000, "sub": "u1"}` becomes
/// `Claims { exp: Some(1700000000), extra: {"sub": "u1"} }` and serializes
/// back to the same object.
///
/// `exp` is kept as raw JSON. A NumericDate may be fractional, and an
/// issuer may put something that isn't a number there at all. Neither
/// makes the payload unreadable. A non-number only makes the expiry
/// unknown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry, in **seconds** since the Unix epoch, as it appeared in the
    /// payload.
    ///
    /// Note the unit: session records store milliseconds. Use
    /// [`Claims::expires_at_ms`] when comparing against a clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<Value>,

    /// Every other claim, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// The `exp` claim converted to milliseconds.
    ///
    /// `None` if `exp` is absent, not a number, or not finite. Fractional
    /// seconds are rounded to the nearest millisecond. Out-of-range values
    /// clamp to the `i64` bounds.
    pub fn expires_at_ms(&self) -> Option<i64> {
        let exp = self.exp.as_ref()?;
        if let Some(secs) = exp.as_i64() {
            return Some(secs.saturating_mul(1000));
        }
        let secs = exp.as_f64()?;
        if !secs.is_finite() {
            return None;
        }
        // Float-to-int `as` saturates at the i64 bounds.
        Some((secs * 1000.0).round() as i64)
    }

    /// Looks up a claim other than `exp` by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
