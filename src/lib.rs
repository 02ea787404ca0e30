//! # TOTP generator, for PC.
//!
//! A small TOTP (RFC 6238) engine with a command-line front end. The
//! engine is layered so each piece depends only on the one below it:
//!
//! - [`base32`] decodes and validates the user-supplied secret text into
//!   raw key bytes — tolerantly on input (case, whitespace, optional
//!   padding), strictly on substance (alphabet, padding shape); it never
//!   silently produces partial output.
//! - [`hotp`] computes an HMAC-based one-time code from a key and a
//!   counter value (RFC 4226), with the hash algorithm parameterized.
//! - [`totp`] derives the counter from Unix time and a fixed step, and
//!   answers remaining-time-in-period queries.
//! - [`session`] drives the display: it owns one secret input's
//!   validation state and decides when the shown code must regenerate.
//!
//! Everything above takes the current time as an explicit parameter and
//! touches no global state, so the whole engine is deterministic and
//! testable without real clocks or sleeps. The command-line layer
//! ([`cli`], [`authenticator`], [`store`], [`share`]) is where clocks are
//! read, arguments are parsed and the saved-secret state file lives.
//!
//! Secret text is held in memory for the duration of a call or session;
//! decoded key material is kept in zeroizing buffers and never logged.

pub use error::{Error, Result};

pub mod authenticator;
pub mod base32;
pub mod cli;
pub mod error;
pub mod hotp;
pub mod session;
pub mod share;
pub mod store;
pub mod totp;
