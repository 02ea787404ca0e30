//! URL-safe encoding of a secret for link sharing.
//!
//! This is a separate step from Base32: the share link carries the exact
//! normalized Base32 *text* (not the decoded bytes), percent-encoded for
//! use as a query-string value, so the receiving end sees the same input
//! the sender typed. Decoding is forgiving; validation happens later when
//! the text reaches the Base32 codec.

use crate::base32;

/// Encodes secret text for a `?s=` query parameter.
pub fn encode_share(secret: &str) -> String {
    urlencoding::encode(&base32::normalize(secret)).into_owned()
}

/// Recovers secret text from a share-link value.
///
/// Falls back to the raw input when percent-decoding fails; either way
/// the result is uppercased so it matches what `encode_share` produced.
pub fn decode_share(encoded: &str) -> String {
    match urlencoding::decode(encoded) {
        Ok(decoded) => decoded.to_uppercase(),
        Err(_) => encoded.to_uppercase(),
    }
}
