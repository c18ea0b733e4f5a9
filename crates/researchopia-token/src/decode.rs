//! Splitting and decoding the three segments of a bearer token.
//!
//! A bearer token looks like `header.payload.signature`, each part
//! base64url-encoded. We never verify the signature; that is the identity
//! provider's (and the server's) job. On the client we only need to peek at
//! the payload to learn when the token expires.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;

use crate::{Claims, TokenError};

/// base64url decoder that accepts segments with or without `=` padding.
///
/// Issuers are supposed to strip padding, but some don't, and browser
/// `atob`-based decoders accept both. Being strict here would turn a
/// perfectly usable token into an "expired" one.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const HEADER: usize = 0;
const PAYLOAD: usize = 1;
const SIGNATURE: usize = 2;

/// Splits a token into its three non-empty segments.
fn split_segments(token: &str) -> Result<[&str; 3], TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    let &[header, payload, signature] = parts.as_slice() else {
        return Err(TokenError::Malformed(parts.len()));
    };

    for (index, segment) in [header, payload, signature].iter().enumerate() {
        if segment.is_empty() {
            return Err(TokenError::EmptySegment(index));
        }
    }

    Ok([header, payload, signature])
}

fn decode_segment(index: usize, segment: &str) -> Result<Vec<u8>, TokenError> {
    BASE64URL
        .decode(segment)
        .map_err(|source| TokenError::Base64 { index, source })
}

/// Decodes a segment that must contain a JSON object (header or payload).
fn decode_json_object(index: usize, segment: &str) -> Result<Value, TokenError> {
    let bytes = decode_segment(index, segment)?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|source| TokenError::Claims { index, source })?;
    if !value.is_object() {
        return Err(TokenError::NotAnObject);
    }
    Ok(value)
}

/// Decodes the claims of a bearer token, reporting why it failed.
///
/// Only the payload segment is decoded; the header and signature just have
/// to be present and non-empty.
///
/// # Errors
/// - [`TokenError::Malformed`]: not exactly three segments
/// - [`TokenError::EmptySegment`]: a segment is empty
/// - [`TokenError::Base64`]: the payload is not base64url
/// - [`TokenError::Claims`] / [`TokenError::NotAnObject`]: the payload is
///   not a JSON object
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments = split_segments(token)?;
    let payload = decode_json_object(PAYLOAD, segments[PAYLOAD])?;
    serde_json::from_value(payload).map_err(|source| TokenError::Claims {
        index: PAYLOAD,
        source,
    })
}

/// Decodes the claims of a bearer token, or `None` if it can't be read.
///
/// This never panics and never returns an error: any malformed segment
/// count, empty segment, base64 failure, or JSON failure yields `None`.
pub fn parse_jwt(token: &str) -> Option<Claims> {
    match decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(err) => {
            tracing::trace!(error = %err, "bearer token could not be decoded");
            None
        }
    }
}

/// Checks that a token is structurally sound, without looking at expiry.
///
/// Returns `true` only when:
/// - there are exactly three non-empty segments,
/// - the header and payload each decode to a JSON object,
/// - the signature segment is valid base64url.
///
/// The signature is raw bytes, not JSON, so it is only checked for
/// decodability.
pub fn validate_token_format(token: &str) -> bool {
    let check = || -> Result<(), TokenError> {
        let segments = split_segments(token)?;
        decode_json_object(HEADER, segments[HEADER])?;
        decode_json_object(PAYLOAD, segments[PAYLOAD])?;
        decode_segment(SIGNATURE, segments[SIGNATURE])?;
        Ok(())
    };

    match check() {
        Ok(()) => true,
        Err(err) => {
            tracing::trace!(error = %err, "bearer token failed format check");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

    fn encode(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Builds `header.payload.signature` from a payload JSON string.
    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            encode(payload),
            URL_SAFE_NO_PAD.encode([7u8; 32]),
        )
    }

    // =====================================================================
    // split_segments()
    // =====================================================================

    #[test]
    fn test_split_segments_two_parts_returns_malformed() {
        assert!(matches!(
            split_segments("a.b"),
            Err(TokenError::Malformed(2))
        ));
    }

    #[test]
    fn test_split_segments_four_parts_returns_malformed() {
        assert!(matches!(
            split_segments("a.b.c.d"),
            Err(TokenError::Malformed(4))
        ));
    }

    #[test]
    fn test_split_segments_empty_middle_returns_empty_segment() {
        assert!(matches!(
            split_segments("a..c"),
            Err(TokenError::EmptySegment(1))
        ));
    }

    #[test]
    fn test_split_segments_empty_string_returns_malformed() {
        // "".split('.') yields one empty segment.
        assert!(matches!(split_segments(""), Err(TokenError::Malformed(1))));
    }

    // =====================================================================
    // decode_claims() / parse_jwt()
    // =====================================================================

    #[test]
    fn test_decode_claims_reads_exp_and_extra() {
        let token = token_with_payload(r#"{"exp":1700000000,"sub":"u1"}"#);

        let claims = decode_claims(&token).expect("should decode");

        assert_eq!(claims.expires_at_ms(), Some(1_700_000_000_000));
        assert_eq!(claims.get("sub").unwrap(), "u1");
    }

    #[test]
    fn test_decode_claims_accepts_padded_payload() {
        let payload = URL_SAFE.encode(r#"{"exp":10}"#);
        assert!(payload.ends_with('='), "fixture should carry padding");
        let token = format!("aGVhZGVy.{payload}.c2ln");

        let claims = decode_claims(&token).expect("padding should be tolerated");
        assert_eq!(claims.expires_at_ms(), Some(10_000));
    }

    #[test]
    fn test_decode_claims_invalid_base64_returns_error() {
        let result = decode_claims("header.***.sig");
        assert!(matches!(result, Err(TokenError::Base64 { index: 1, .. })));
    }

    #[test]
    fn test_decode_claims_non_json_payload_returns_error() {
        let token = format!("h.{}.s", encode("not json"));
        let result = decode_claims(&token);
        assert!(matches!(result, Err(TokenError::Claims { index: 1, .. })));
    }

    #[test]
    fn test_decode_claims_array_payload_returns_not_an_object() {
        let token = format!("h.{}.s", encode("[1,2,3]"));
        assert!(matches!(decode_claims(&token), Err(TokenError::NotAnObject)));
    }

    #[test]
    fn test_parse_jwt_ignores_header_and_signature_contents() {
        // Only the payload is decoded; the other segments just need to exist.
        let token = format!("!!!.{}.!!!", encode(r#"{"exp":5}"#));
        assert_eq!(parse_jwt(&token).unwrap().expires_at_ms(), Some(5_000));
    }

    #[test]
    fn test_parse_jwt_fractional_exp_returns_claims() {
        let token = token_with_payload(r#"{"exp":1792375204.469,"sub":"u1"}"#);
        let claims = parse_jwt(&token).expect("fractional exp is a valid NumericDate");
        assert_eq!(claims.expires_at_ms(), Some(1_792_375_204_469));
    }

    #[test]
    fn test_parse_jwt_string_exp_returns_claims() {
        let token = token_with_payload(r#"{"exp":"soon","sub":"u1"}"#);
        let claims = parse_jwt(&token).expect("payload is still a JSON object");
        assert_eq!(claims.get("sub").unwrap(), "u1");
        assert_eq!(claims.expires_at_ms(), None);
    }

    #[test]
    fn test_parse_jwt_malformed_returns_none() {
        assert!(parse_jwt("only.two").is_none());
        assert!(parse_jwt("a.b.c.d").is_none());
        assert!(parse_jwt("").is_none());
        assert!(parse_jwt("a..c").is_none());
    }

    // =====================================================================
    // validate_token_format()
    // =====================================================================

    #[test]
    fn test_validate_token_format_well_formed_returns_true() {
        let token = token_with_payload(r#"{"sub":"u1"}"#);
        assert!(validate_token_format(&token));
    }

    #[test]
    fn test_validate_token_format_ignores_expiry() {
        // exp = 1 second after the epoch: long expired, still well-formed.
        let token = token_with_payload(r#"{"exp":1}"#);
        assert!(validate_token_format(&token));
    }

    #[test]
    fn test_validate_token_format_accepts_fractional_and_non_numeric_exp() {
        assert!(validate_token_format(&token_with_payload(r#"{"exp":1792375204.5}"#)));
        assert!(validate_token_format(&token_with_payload(r#"{"exp":"soon"}"#)));
    }

    #[test]
    fn test_validate_token_format_non_json_header_returns_false() {
        let token = format!(
            "{}.{}.{}",
            encode("not json"),
            encode(r#"{"exp":1}"#),
            encode("sig")
        );
        assert!(!validate_token_format(&token));
    }

    #[test]
    fn test_validate_token_format_undecodable_signature_returns_false() {
        // A single base64 character can never decode to a whole byte.
        let token = format!(
            "{}.{}.A",
            encode(r#"{"alg":"none"}"#),
            encode(r#"{"exp":1}"#)
        );
        assert!(!validate_token_format(&token));
    }

    #[test]
    fn test_validate_token_format_wrong_segment_count_returns_false() {
        assert!(!validate_token_format("a.b"));
        assert!(!validate_token_format("a.b.c.d"));
    }
}
