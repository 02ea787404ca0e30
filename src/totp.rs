//! RFC 6238 TOTP: HOTP with the counter derived from wall-clock time.
//!
//! Nothing in this module reads a clock. The current Unix time always
//! arrives as an explicit parameter, so every function is a pure value
//! computation and unit tests never need real time or sleeps.

use crate::hotp::{hotp, Algorithm};
use crate::{Error, Result};

/// Generation parameters, fixed for the lifetime of a session.
///
/// Immutable by construction; callers that need different parameters build
/// a second value instead of mutating a shared one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub step: u32,
    pub digits: u32,
    pub algorithm: Algorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step: 30,
            digits: 6,
            algorithm: Algorithm::Sha1,
        }
    }
}

impl Config {
    /// Builds a validated configuration: `step` must be at least one
    /// second, `digits` within `1..=9`.
    pub fn new(step: u32, digits: u32, algorithm: Algorithm) -> Result<Self> {
        if step == 0 {
            return Err(Error::InvalidStep);
        }
        if digits < 1 || digits > 9 {
            return Err(Error::InvalidDigits(digits));
        }
        Ok(Self { step, digits, algorithm })
    }
}

/// Number of completed time steps since the Unix epoch.
pub fn counter(now_seconds: u64, step: u32) -> u64 {
    now_seconds / u64::from(step)
}

/// TOTP code for `key` at `now_seconds` under `config`.
pub fn totp(key: &[u8], now_seconds: u64, config: &Config) -> Result<String> {
    hotp(
        key,
        counter(now_seconds, config.step),
        config.digits,
        config.algorithm,
    )
}

/// Seconds left in the current period, in `[1, step]`.
///
/// The boundary instant belongs to the start of the new period: at
/// `now % step == 0` the full window is reported, never zero.
pub fn time_remaining(now_seconds: u64, step: u32) -> u32 {
    let step64 = u64::from(step);
    (step64 - (now_seconds % step64)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_floor_of_time_over_step() {
        assert_eq!(counter(0, 30), 0);
        assert_eq!(counter(29, 30), 0);
        assert_eq!(counter(30, 30), 1);
        assert_eq!(counter(59, 30), 1);
        assert_eq!(counter(60, 30), 2);
    }

    #[test]
    fn counter_steps_exactly_at_period_boundaries() {
        for n in [1u64, 2, 17, 1_000_000] {
            assert_eq!(counter(30 * n - 1, 30), n - 1);
            assert_eq!(counter(30 * n, 30), n);
            assert_eq!(counter(30 * n + 29, 30), n);
        }
    }

    #[test]
    fn same_period_same_code() {
        let key = crate::base32::decode("JBSWY3DPEHPK3PXP").unwrap();
        let config = Config::default();
        for n in [0u64, 1, 5, 12345] {
            let start = totp(&key, 30 * n, &config).unwrap();
            let end = totp(&key, 30 * n + 29, &config).unwrap();
            assert_eq!(start, end);
        }
    }

    #[test]
    fn remaining_is_full_step_at_boundary() {
        assert_eq!(time_remaining(0, 30), 30);
        assert_eq!(time_remaining(30, 30), 30);
        assert_eq!(time_remaining(60, 30), 30);
    }

    #[test]
    fn remaining_counts_down_to_one() {
        assert_eq!(time_remaining(1, 30), 29);
        assert_eq!(time_remaining(29, 30), 1);
        assert_eq!(time_remaining(59, 30), 1);
        for now in 0..300u64 {
            let remaining = time_remaining(now, 30);
            assert!(remaining >= 1 && remaining <= 30, "now={}", now);
        }
    }

    #[test]
    fn end_to_end_regression_vector() {
        // pinned at implementation time; any change here is a behavior change
        let key = crate::base32::decode("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(totp(&key, 0, &Config::default()).unwrap(), "282760");
    }

    #[test]
    fn config_rejects_degenerate_parameters() {
        assert_eq!(Config::new(0, 6, Algorithm::Sha1), Err(Error::InvalidStep));
        assert_eq!(
            Config::new(30, 0, Algorithm::Sha1),
            Err(Error::InvalidDigits(0))
        );
        assert_eq!(
            Config::new(30, 12, Algorithm::Sha1),
            Err(Error::InvalidDigits(12))
        );
    }
}
