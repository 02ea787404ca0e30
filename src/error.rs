//! Error taxonomy of the engine.
//!
//! Everything here is terminal for a single call only; the engine keeps no
//! error state and fully recovers on the next call with corrected input.

/// Errors surfaced by the engine and the secret store.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The secret text is not valid Base32 after whitespace stripping and
    /// uppercasing. Locally recoverable: the caller shows "no code" and
    /// prompts for correction.
    #[error("secret is not valid Base32 (characters A-Z and 2-7, optional '=' padding)")]
    InvalidEncoding,

    /// Requested code width is outside the workable range.
    #[error("digits must be between 1 and 9, got {0}")]
    InvalidDigits(u32),

    /// A period of zero seconds can never produce a counter.
    #[error("step must be at least 1 second")]
    InvalidStep,

    /// Unexpected failure inside the HMAC/truncation path. Deterministic,
    /// so retrying with unchanged input fails identically.
    #[error("could not compute HMAC: {0}")]
    GenerationFailure(&'static str),

    /// No stored secret under the given id.
    #[error("no saved secret with id {0}")]
    UnknownId(String),

    /// The saved-secret state file could not be read or written.
    #[error("state file error: {0}")]
    Store(String),
}

/// Crate-local result alias.
pub type Result<T> = core::result::Result<T, Error>;
