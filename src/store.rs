//! File-backed store for saved secrets.
//!
//! Records are kept as one `postcard`-serialized vector in the state file
//! named on the command line; every mutation rewrites the file. Secrets
//! are stored as the Base32 text the user typed (encryption at rest is
//! out of scope here), keyed by an opaque random id.

use std::path::{Path, PathBuf};

use log::{debug, info};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{base32, Error, Result};

/// A saved secret and its metadata.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SavedSecret {
    pub id: String,
    pub title: String,
    pub secret: String,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub is_favorite: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Input for [`SecretStore::add`]; id and timestamps are filled in there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewSecret {
    pub title: String,
    pub secret: String,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub is_favorite: bool,
}

pub struct SecretStore {
    path: PathBuf,
    records: Vec<SavedSecret>,
}

impl SecretStore {
    /// Opens the store at `path`, starting empty if the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path: PathBuf = path.as_ref().into();
        let records = match std::fs::read(&path) {
            Ok(bytes) => postcard::from_bytes(&bytes)
                .map_err(|e| Error::Store(format!("could not parse {}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no state file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => return Err(Error::Store(e.to_string())),
        };
        debug!("loaded {} saved secret(s)", records.len());
        Ok(Self { path, records })
    }

    fn persist(&self) -> Result<()> {
        let bytes = postcard::to_allocvec(&self.records)
            .map_err(|e| Error::Store(e.to_string()))?;
        std::fs::write(&self.path, bytes).map_err(|e| Error::Store(e.to_string()))
    }

    /// Saves a new secret. The secret text must be valid Base32; the
    /// caller-supplied `now` becomes both timestamps.
    pub fn add(&mut self, new: NewSecret, now: u64) -> Result<&SavedSecret> {
        base32::decode(&new.secret)?;

        let record = SavedSecret {
            id: random_id(),
            title: new.title,
            secret: new.secret,
            notes: new.notes,
            color: new.color,
            is_favorite: new.is_favorite,
            created_at: now,
            updated_at: now,
        };
        info!("saved secret {} ({:?})", record.id, record.title);
        self.records.push(record);
        self.persist()?;
        Ok(self.records.last().unwrap())
    }

    pub fn get(&self, id: &str) -> Option<&SavedSecret> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Looks a record up by its secret text, comparing normalized forms.
    pub fn find_by_secret(&self, secret: &str) -> Option<&SavedSecret> {
        let wanted = base32::normalize(secret);
        self.records
            .iter()
            .find(|r| base32::normalize(&r.secret) == wanted)
    }

    pub fn remove(&mut self, id: &str) -> Result<SavedSecret> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::UnknownId(id.into()))?;
        let record = self.records.remove(index);
        self.persist()?;
        info!("deleted secret {}", id);
        Ok(record)
    }

    pub fn toggle_favorite(&mut self, id: &str, now: u64) -> Result<&SavedSecret> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::UnknownId(id.into()))?;
        {
            let record = &mut self.records[index];
            record.is_favorite = !record.is_favorite;
            record.updated_at = now;
        }
        self.persist()?;
        Ok(&self.records[index])
    }

    /// All records, favorites first, then newest first.
    pub fn list(&self) -> Vec<&SavedSecret> {
        let mut records: Vec<&SavedSecret> = self.records.iter().collect();
        records.sort_by(|a, b| {
            b.is_favorite
                .cmp(&a.is_favorite)
                .then(b.created_at.cmp(&a.created_at))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn random_id() -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    data_encoding::HEXLOWER.encode(&bytes)
}
