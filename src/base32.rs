//! RFC 4648 Base32 codec for shared secrets.
//!
//! Authenticator secrets arrive as human-typed text, so `decode` is
//! deliberately tolerant on the way in: whitespace is stripped, case is
//! folded, padding is optional. Validation is still strict about the
//! alphabet and about padding shapes the RFC actually permits; anything
//! else is rejected outright rather than decoded into garbage bytes.
//!
//! Encoding is canonical (uppercase, padded) and delegated to
//! [`data_encoding::BASE32`].

use crate::{Error, Result};

/// Strips all whitespace and uppercases, the normal form every other
/// operation (decoding, store lookups, share links) works on.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Decodes user-supplied Base32 text into raw key bytes.
///
/// The input is normalized first, then validated against the RFC 4648
/// alphabet (`A`-`Z`, `2`-`7`) with optional trailing `=` padding. Valid
/// padding counts for the final 8-character group are 0, 1, 3, 4 and 6;
/// an empty string, or one that is all padding, is invalid.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let cleaned = normalize(text);

    let unpadded = cleaned.trim_end_matches('=');
    let padding = cleaned.len() - unpadded.len();

    if unpadded.is_empty() {
        return Err(Error::InvalidEncoding);
    }
    if ![0, 1, 3, 4, 6].contains(&padding) {
        return Err(Error::InvalidEncoding);
    }
    if padding > 0 && cleaned.len() % 8 != 0 {
        return Err(Error::InvalidEncoding);
    }
    // final unpadded group must hold a whole number of 5-bit symbols
    // that RFC 4648 can produce: 2, 4, 5 or 7 of them (or none)
    if ![0, 2, 4, 5, 7].contains(&(unpadded.len() % 8)) {
        return Err(Error::InvalidEncoding);
    }

    // pack 5-bit groups into bytes MSB-first; trailing bits that don't
    // complete a byte are discarded per the standard
    let mut output = Vec::with_capacity(unpadded.len() * 5 / 8);
    let mut buffer = 0u32;
    let mut bits = 0u32;
    for b in unpadded.bytes() {
        let value = match b {
            b'A'..=b'Z' => u32::from(b - b'A'),
            b'2'..=b'7' => u32::from(b - b'2') + 26,
            // anything else, including interior '=' (only trailing
            // padding was stripped above), is not Base32
            _ => return Err(Error::InvalidEncoding),
        };
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            output.push((buffer >> (bits - 8)) as u8);
            bits -= 8;
        }
    }

    Ok(output)
}

/// Canonical padded Base32 rendition of raw bytes.
pub fn encode(bytes: &[u8]) -> String {
    data_encoding::BASE32.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_canonical_input() {
        assert_eq!(decode("MFRGGZDF").unwrap(), b"abcde");
        assert_eq!(decode("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap(), b"12345678901234567890");
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(decode("  mfrgg   zdf   ").unwrap(), decode("MFRGGZDF").unwrap());
        assert_eq!(decode("jbsw y3dp ehpk 3pxp").unwrap(), decode("JBSWY3DPEHPK3PXP").unwrap());
    }

    #[test]
    fn accepts_valid_padding() {
        assert_eq!(decode("MFRGGZA=").unwrap(), b"abcd");
        assert_eq!(decode("MFRGG===").unwrap(), b"abc");
        assert_eq!(decode("MFRA====").unwrap(), b"ab");
        assert_eq!(decode("AA======").unwrap(), &[0u8][..]);
    }

    #[test]
    fn accepts_unpadded_partial_group() {
        // 10 symbols = 50 bits; the 2 trailing bits are discarded
        assert_eq!(decode("JBSWY3DPEE").unwrap(), b"Hello!");
    }

    #[test]
    fn rejects_bad_alphabet() {
        assert_eq!(decode("not-base32!!"), Err(Error::InvalidEncoding));
        assert_eq!(decode("ABC189"), Err(Error::InvalidEncoding));
    }

    #[test]
    fn rejects_empty_and_all_padding() {
        assert_eq!(decode(""), Err(Error::InvalidEncoding));
        assert_eq!(decode("   "), Err(Error::InvalidEncoding));
        assert_eq!(decode("========"), Err(Error::InvalidEncoding));
    }

    #[test]
    fn rejects_bad_padding_shapes() {
        // 2, 5 and 7 are not paddings RFC 4648 can produce
        assert_eq!(decode("MFRGGZ=="), Err(Error::InvalidEncoding));
        assert_eq!(decode("MFR====="), Err(Error::InvalidEncoding));
        // padded input must fill the 8-character group
        assert_eq!(decode("MFRA==="), Err(Error::InvalidEncoding));
        // interior padding
        assert_eq!(decode("MF=A===="), Err(Error::InvalidEncoding));
    }

    #[test]
    fn rejects_impossible_unpadded_length() {
        // 1, 3 and 6 symbols cannot fall out of whole input bytes
        assert_eq!(decode("M"), Err(Error::InvalidEncoding));
        assert_eq!(decode("MFR"), Err(Error::InvalidEncoding));
        assert_eq!(decode("MFRGGZ"), Err(Error::InvalidEncoding));
    }

    #[test]
    fn round_trips_canonical_encoding() {
        let cases: [&[u8]; 6] = [b"a", b"ab", b"abc", b"abcd", b"abcde", b"Hello!\xde\xad\xbe\xef"];
        for bytes in cases {
            assert_eq!(decode(&encode(bytes)).unwrap(), bytes);
        }
    }
}
