//! Bearer token inspection for Researchopia.
//!
//! This crate answers one question about an access token: **is it usable
//! right now?** It does that by peeking at the token's payload, never by
//! verifying its signature (the identity provider and the server do that).
//!
//! - **Claims** ([`Claims`]): the decoded payload, with a typed `exp` and
//!   every other claim kept in a map.
//! - **Decoding** ([`parse_jwt`], [`decode_claims`], [`validate_token_format`]):
//!   splitting `header.payload.signature` and base64url-decoding it.
//! - **Expiry** ([`is_token_expired`], [`get_token_expiry`],
//!   [`is_token_expiring_soon`]): fail-closed checks against the wall clock.
//!
//! Everything here is a pure function of its input (plus the clock). There
//! is no state to set up.
//!
//! # How it fits in the stack
//!
//! ```text
//! Events (beside)    ← AuthController emits after acting on these answers
//! Session (above)    ← reuses the clock; persists the token verbatim
//!     ↕
//! Token (this crate) ← decodes claims, answers expiry questions
//! ```
//!
//! # Example
//!
//! ```rust
//! use researchopia_token::{is_token_expired, parse_jwt, validate_token_format};
//!
//! // {"alg":"HS256"} . {"sub":"u1"} . "sig"
//! let token = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ1MSJ9.c2ln";
//!
//! assert!(validate_token_format(token));
//! assert_eq!(parse_jwt(token).unwrap().get("sub").unwrap(), "u1");
//! // No `exp` claim: fail-closed.
//! assert!(is_token_expired(token));
//! ```

mod claims;
mod clock;
mod decode;
mod error;
mod expiry;

pub use claims::Claims;
pub use clock::now_millis;
pub use decode::{decode_claims, parse_jwt, validate_token_format};
pub use error::TokenError;
pub use expiry::{
    DEFAULT_EXPIRY_THRESHOLD_MS, get_token_expiry, is_token_expired, is_token_expired_at,
    is_token_expiring_soon, is_token_expiring_soon_at, is_token_expiring_soon_default,
};
