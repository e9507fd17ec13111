//! Snapshot persistence for the local ledger.

use super::LedgerError;
use crate::engine::Match;
use crate::protocol::{MatchEvent, PrincipalId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A registered principal as kept at rest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRecord {
    pub id: PrincipalId,
    pub name: String,
    /// Hex SHA-256 of the bearer token
    pub credential_digest: String,
}

/// Everything the local ledger needs to survive a restart
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub game: Match,
    pub principals: Vec<PrincipalRecord>,
    pub events: Vec<MatchEvent>,
}

/// Storage backend for ledger snapshots
pub trait MatchStore: Send + Sync {
    /// Load the last saved snapshot, if any
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerError>;

    /// Replace the saved snapshot
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError>;
}

/// Keeps the last snapshot in memory only
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<LedgerSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryStore {
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerError> {
        Ok(self.saved.lock().map_err(|_| LedgerError::Poisoned)?.clone())
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        *self.saved.lock().map_err(|_| LedgerError::Poisoned)? = Some(snapshot.clone());
        Ok(())
    }
}

/// Stores the snapshot as a single JSON file.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a reader never sees a half-written snapshot.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store at `path`, creating parent directories as needed
    pub fn new(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchStore for JsonFileStore {
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)?;
        let snapshot: LedgerSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        if !snapshot.game.is_consistent() {
            return Err(LedgerError::CorruptSnapshot(format!(
                "match in {} violates its lifecycle invariants",
                self.path.display()
            )));
        }

        tracing::debug!("Loaded ledger snapshot from {}", self.path.display());
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        let temp_path = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Saved ledger snapshot to {}", self.path.display());
        Ok(())
    }
}
