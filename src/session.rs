//! Drives code display for one secret input over time.
//!
//! A [`Session`] owns the current secret text and its decoded key, and
//! turns clock readings into display snapshots. The state machine per
//! secret input is
//!
//! ```text
//! Empty -> Invalid -> Valid -> (re-enter Invalid or Empty on edit/clear)
//! ```
//!
//! From `Valid`, producing a code is a pure read driven by the clock. The
//! session itself never looks at a clock; the driving loop (a timer tick,
//! typically once per second) passes the current Unix time into
//! [`Session::tick`]. The displayed code is recomputed exactly once per
//! period transition and immediately after every secret change; a secret
//! that fails validation drops straight to an explicit no-code state,
//! never a stale one.

use log::debug;
use zeroize::Zeroizing;

use crate::totp::{self, Config};
use crate::{base32, Result};

/// Validation state of the current secret input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretState {
    /// No secret entered.
    Empty,
    /// Secret text present but not valid Base32.
    Invalid,
    /// Secret decoded; codes can be generated.
    Valid,
}

/// One snapshot of what the display should show.
#[derive(Clone, Debug, PartialEq)]
pub struct Display {
    pub state: SecretState,
    /// `None` in the `Empty` and `Invalid` states ("no code"), otherwise
    /// the current zero-padded code.
    pub code: Option<String>,
    pub remaining_seconds: u32,
}

/// Code-display driver for a single secret input.
pub struct Session {
    config: Config,
    state: SecretState,
    // decoded key bytes, wiped on drop and on every replacement
    key: Option<Zeroizing<Vec<u8>>>,
    code: Option<String>,
    last_counter: Option<u64>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: SecretState::Empty,
            key: None,
            code: None,
            last_counter: None,
        }
    }

    pub fn state(&self) -> SecretState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the secret input, re-validating from scratch.
    ///
    /// Any cached code is dropped here: after an edit the next [`tick`]
    /// recomputes immediately, and an invalid or empty input can never
    /// keep showing the previous secret's code.
    ///
    /// [`tick`]: Session::tick
    pub fn set_secret(&mut self, text: &str) {
        self.code = None;
        self.last_counter = None;

        if base32::normalize(text).is_empty() {
            self.state = SecretState::Empty;
            self.key = None;
            debug!("secret input cleared");
            return;
        }

        match base32::decode(text) {
            Ok(bytes) => {
                debug!("secret accepted ({} key bytes)", bytes.len());
                self.key = Some(Zeroizing::new(bytes));
                self.state = SecretState::Valid;
            }
            Err(_) => {
                debug!("secret rejected: not valid Base32");
                self.key = None;
                self.state = SecretState::Invalid;
            }
        }
    }

    /// Explicit user clearing; the only way back to `Empty`.
    pub fn clear(&mut self) {
        self.set_secret("");
    }

    /// Advances the session to `now_seconds` and returns the snapshot to
    /// display.
    ///
    /// The code is regenerated when the period counter has moved since the
    /// last tick (which is exactly the "remaining time just reset to the
    /// full step" observation, and also covers ticks that arrive late and
    /// skip past a boundary) or when no code has been computed since the
    /// last secret change. `Err` means the HMAC path itself failed, which
    /// is an environment problem, not bad input.
    pub fn tick(&mut self, now_seconds: u64) -> Result<Display> {
        let remaining_seconds = totp::time_remaining(now_seconds, self.config.step);

        let key = match (self.state, &self.key) {
            (SecretState::Valid, Some(key)) => key,
            _ => {
                return Ok(Display {
                    state: self.state,
                    code: None,
                    remaining_seconds,
                });
            }
        };

        let counter = totp::counter(now_seconds, self.config.step);
        if self.code.is_none() || self.last_counter != Some(counter) {
            let code = totp::totp(key, now_seconds, &self.config)?;
            debug!("code regenerated for period {}", counter);
            self.code = Some(code);
            self.last_counter = Some(counter);
        }

        Ok(Display {
            state: SecretState::Valid,
            code: self.code.clone(),
            remaining_seconds,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

// keep the secret text itself out of Debug output
impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}
