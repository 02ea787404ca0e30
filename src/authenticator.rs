//! The store-backed TOTP app behind the command line.
//!
//! Command inputs are declared as plain Rust structs, which keeps argument
//! parsing (`cli`) separate from the operations themselves: this module
//! only sees typed requests and the explicit timestamps resolved at the
//! edge, never `ArgMatches` or the system clock.

use log::debug;
use zeroize::Zeroizing;

use crate::store::{NewSecret, SavedSecret, SecretStore};
use crate::totp::Config;
use crate::{base32, share, totp, Error, Result};

/// A secret given on the command line: typed out, or the id of a saved one.
#[derive(Clone, Debug, PartialEq)]
pub enum SecretRef {
    Literal(String),
    Saved(String),
}

/// Save a secret under a title.
#[derive(Clone, Debug, PartialEq)]
pub struct Register {
    pub title: String,
    pub secret: String,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub favorite: bool,
}

/// Produce one code for a secret at a fixed timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Generate {
    pub secret: SecretRef,
    /// Seconds since the UNIX epoch.
    pub timestamp: u64,
    pub config: Config,
}

/// Follow a secret with a live countdown.
#[derive(Clone, Debug, PartialEq)]
pub struct Watch {
    pub secret: SecretRef,
    pub config: Config,
}

/// Print the URL-safe share component for a secret.
#[derive(Clone, Debug, PartialEq)]
pub struct Share {
    pub secret: SecretRef,
}

/// Everything this app can be asked to do.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Command {
    Register(Register),
    Generate(Generate),
    Watch(Watch),
    List,
    Delete { id: String },
    Favorite { id: String },
    Share(Share),
}

/// The app itself: a secret store plus the pure engine underneath.
pub struct Authenticator {
    store: SecretStore,
}

impl Authenticator {
    /// Constructor, consumes the opened store.
    pub fn new(store: SecretStore) -> Self {
        Self { store }
    }

    /// Validates and saves a new secret, returning its opaque id.
    pub fn register(&mut self, parameters: &Register, now: u64) -> Result<String> {
        debug!("register {:?}", parameters.title);
        let record = self.store.add(
            NewSecret {
                title: parameters.title.clone(),
                secret: parameters.secret.clone(),
                notes: parameters.notes.clone(),
                color: parameters.color.clone(),
                is_favorite: parameters.favorite,
            },
            now,
        )?;
        Ok(record.id.clone())
    }

    /// Computes one code for a literal or saved secret.
    pub fn generate(&self, parameters: &Generate) -> Result<String> {
        let text = self.resolve(&parameters.secret)?;
        let key = Zeroizing::new(base32::decode(&text)?);
        totp::totp(&key, parameters.timestamp, &parameters.config)
    }

    /// Share-link component for a literal or saved secret.
    pub fn share(&self, parameters: &Share) -> Result<String> {
        let text = self.resolve(&parameters.secret)?;
        // only well-formed secrets are worth sharing
        base32::decode(&text)?;
        Ok(share::encode_share(&text))
    }

    pub fn delete(&mut self, id: &str) -> Result<SavedSecret> {
        self.store.remove(id)
    }

    /// Flips the favorite flag, returning the new value.
    pub fn favorite(&mut self, id: &str, now: u64) -> Result<bool> {
        Ok(self.store.toggle_favorite(id, now)?.is_favorite)
    }

    pub fn list(&self) -> Vec<&SavedSecret> {
        self.store.list()
    }

    /// Turns a [`SecretRef`] into secret text, looking saved ids up in the
    /// store.
    pub fn resolve(&self, secret: &SecretRef) -> Result<String> {
        match secret {
            SecretRef::Literal(text) => Ok(text.clone()),
            SecretRef::Saved(id) => self
                .store
                .get(id)
                .map(|record| record.secret.clone())
                .ok_or_else(|| Error::UnknownId(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotp::Algorithm;

    fn authenticator() -> (tempfile::TempDir, Authenticator) {
        let dir = tempfile::tempdir().unwrap();
        let store = SecretStore::open(dir.path().join("state.postcard")).unwrap();
        (dir, Authenticator::new(store))
    }

    fn register(title: &str, secret: &str) -> Register {
        Register {
            title: title.into(),
            secret: secret.into(),
            notes: None,
            color: None,
            favorite: false,
        }
    }

    #[test]
    fn generates_from_literal_secret() {
        let (_dir, authenticator) = authenticator();
        let code = authenticator
            .generate(&Generate {
                secret: SecretRef::Literal("JBSWY3DPEHPK3PXP".into()),
                timestamp: 0,
                config: Config::default(),
            })
            .unwrap();
        assert_eq!(code, "282760");
    }

    #[test]
    fn generates_from_saved_secret() {
        let (_dir, mut authenticator) = authenticator();
        let id = authenticator
            .register(&register("demo", "JBSWY3DPEHPK3PXP"), 0)
            .unwrap();

        let code = authenticator
            .generate(&Generate {
                secret: SecretRef::Saved(id),
                timestamp: 0,
                config: Config::default(),
            })
            .unwrap();
        assert_eq!(code, "282760");
    }

    #[test]
    fn unknown_id_is_reported_as_such() {
        let (_dir, authenticator) = authenticator();
        let result = authenticator.generate(&Generate {
            secret: SecretRef::Saved("feedfacecafebeef".into()),
            timestamp: 0,
            config: Config::default(),
        });
        assert_eq!(result, Err(Error::UnknownId("feedfacecafebeef".into())));
    }

    #[test]
    fn eight_digit_codes_match_the_rfc_vectors() {
        let (_dir, authenticator) = authenticator();
        let config = Config::new(30, 8, Algorithm::Sha1).unwrap();
        let generate = |timestamp| {
            authenticator
                .generate(&Generate {
                    secret: SecretRef::Literal("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".into()),
                    timestamp,
                    config,
                })
                .unwrap()
        };
        assert_eq!(generate(59), "94287082");
        assert_eq!(generate(1_111_111_109), "07081804");
        assert_eq!(generate(1_234_567_890), "89005924");
    }

    #[test]
    fn share_rejects_invalid_secrets() {
        let (_dir, authenticator) = authenticator();
        let result = authenticator.share(&Share {
            secret: SecretRef::Literal("not-base32!!".into()),
        });
        assert_eq!(result, Err(Error::InvalidEncoding));
    }

    #[test]
    fn share_round_trips_saved_secret_text() {
        let (_dir, mut authenticator) = authenticator();
        let id = authenticator
            .register(&register("shared", "jbsw y3dp ehpk 3pxp"), 0)
            .unwrap();
        let component = authenticator
            .share(&Share { secret: SecretRef::Saved(id) })
            .unwrap();
        assert_eq!(crate::share::decode_share(&component), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn favorite_toggles_round_trip() {
        let (_dir, mut authenticator) = authenticator();
        let id = authenticator
            .register(&register("starred", "MFRGGZDF"), 0)
            .unwrap();
        assert!(authenticator.favorite(&id, 1).unwrap());
        assert!(!authenticator.favorite(&id, 2).unwrap());
    }
}
