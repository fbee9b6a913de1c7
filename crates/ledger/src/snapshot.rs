//! Persisted form of the ledger and the stores that read and write it.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{CredentialHash, LedgerError, MoneyCents};

pub const DEFAULT_DATA_FILE: &str = "expense_tracker_data.json";

/// Full persisted state of a ledger.
///
/// Every key is optional on read; a missing key falls back to its zero
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub expenses: BTreeMap<String, MoneyCents>,
    pub income: MoneyCents,
    pub username: Option<String>,
    #[serde(rename = "_password_hash")]
    pub credential_hash: Option<CredentialHash>,
}

/// Where snapshots live.
pub trait PersistenceStore {
    /// Reads the stored snapshot. `Ok(None)` means nothing has been stored
    /// yet.
    fn load(&self) -> Result<Option<Snapshot>, LedgerError>;

    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<(), LedgerError>;
}

/// Whole-file JSON store. Writes are not atomic.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}
