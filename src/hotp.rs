//! RFC 4226 HOTP: HMAC an 8-byte counter, dynamically truncate, take the
//! low decimal digits.
//!
//! SHA-1 is the default everything interoperates with; SHA-256/512 exist
//! for the RFC 6238 variants some services negotiate.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::{Error, Result};

/// HMAC hash function used for code generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Sha1
    }
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
        }
    }
}

/// Computes the HOTP code for `key` at `counter`.
///
/// The counter is encoded as an 8-byte big-endian integer and MACed; the
/// digest is truncated per RFC 4226 section 5.3 and reduced modulo
/// `10^digits`. The result always has exactly `digits` characters,
/// left-padded with `'0'`.
pub fn hotp(key: &[u8], counter: u64, digits: u32, algorithm: Algorithm) -> Result<String> {
    if digits < 1 || digits > 9 {
        return Err(Error::InvalidDigits(digits));
    }

    let counter_bytes = counter.to_be_bytes();
    let digest: Vec<u8> = match algorithm {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key)
                .map_err(|_| Error::GenerationFailure("HMAC-SHA1 rejected the key"))?;
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|_| Error::GenerationFailure("HMAC-SHA256 rejected the key"))?;
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key)
                .map_err(|_| Error::GenerationFailure("HMAC-SHA512 rejected the key"))?;
            mac.update(&counter_bytes);
            mac.finalize().into_bytes().to_vec()
        }
    };

    // dynamic truncation: low 4 bits of the last byte locate a 4-byte
    // window; the top bit is masked to keep the value a 31-bit integer
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let bin_code = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    let code = bin_code % 10u32.pow(digits);
    Ok(format!("{:0width$}", code, width = digits as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4226 appendix D, secret "12345678901234567890"
    const KEY: &[u8] = b"12345678901234567890";

    #[test]
    fn rfc4226_appendix_d_vectors() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        for (counter, want) in expected.iter().enumerate() {
            let code = hotp(KEY, counter as u64, 6, Algorithm::Sha1).unwrap();
            assert_eq!(&code, want, "counter {}", counter);
        }
    }

    #[test]
    fn output_is_exactly_digits_wide() {
        for digits in 1..=9 {
            let code = hotp(KEY, 0, digits, Algorithm::Sha1).unwrap();
            assert_eq!(code.len(), digits as usize);
        }
    }

    #[test]
    fn preserves_leading_zeros() {
        // counter 29 under this key truncates to a value below 10^5
        let key = crate::base32::decode("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(hotp(&key, 29, 6, Algorithm::Sha1).unwrap(), "067820");
    }

    #[test]
    fn deterministic() {
        let a = hotp(KEY, 42, 6, Algorithm::Sha1).unwrap();
        let b = hotp(KEY, 42, 6, Algorithm::Sha1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_unworkable_digits() {
        assert_eq!(hotp(KEY, 0, 0, Algorithm::Sha1), Err(Error::InvalidDigits(0)));
        assert_eq!(hotp(KEY, 0, 10, Algorithm::Sha1), Err(Error::InvalidDigits(10)));
    }
}
