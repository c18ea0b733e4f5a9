//! Error types for the token layer.
//!
//! The public predicates ([`is_token_expired`](crate::is_token_expired) and
//! friends) never return these. They exist for
//! [`decode_claims`](crate::decode_claims), which tells the caller *why*
//! a token could not be read, and for logging.

/// Reasons a bearer token could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token did not split into exactly three dot-separated segments.
    #[error("expected 3 token segments, found {0}")]
    Malformed(usize),

    /// One of the three segments was empty (e.g. `"a..c"`).
    #[error("token segment {0} is empty")]
    EmptySegment(usize),

    /// A segment was not valid base64url.
    #[error("segment {index} is not valid base64url: {source}")]
    Base64 {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    /// A segment decoded to bytes that are not valid JSON.
    #[error("segment {index} is not a valid claim set: {source}")]
    Claims {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The payload was valid JSON but not an object.
    #[error("token payload is not a JSON object")]
    NotAnObject,
}
