//! JSON snapshot file backing a [`MemoryStore`] between CLI invocations.
//!
//! The file is the host's durable storage: it is read before a call and
//! rewritten only after the call commits. Writes go to a sibling temp file
//! that is renamed over the original, so a crash mid-write leaves the
//! previous state intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::memory::{LedgerTables, MemoryStore};
use crate::error::{Error, Result};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    tables: LedgerTables,
}

/// A ledger state file on disk.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store, or an empty one if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// was written by an unknown format version.
    pub fn load(&self) -> Result<MemoryStore> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No state file, starting empty ledger");
            return Ok(MemoryStore::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.version != FORMAT_VERSION {
            return Err(Error::Storage(format!(
                "unsupported state file version {} (expected {FORMAT_VERSION})",
                snapshot.version
            )));
        }
        debug!(path = %self.path.display(), "Loaded state file");
        Ok(MemoryStore::from_tables(snapshot.tables))
    }

    /// Persist the committed state of `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is still open or the file cannot
    /// be written.
    pub fn save(&self, store: &MemoryStore) -> Result<()> {
        if store.in_transaction() {
            return Err(Error::Storage(
                "refusing to save state with an open transaction".into(),
            ));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot {
            version: FORMAT_VERSION,
            tables: store.tables(),
        };
        let content = serde_json::to_string_pretty(&snapshot)?;

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "Saved state file");
        Ok(())
    }
}
