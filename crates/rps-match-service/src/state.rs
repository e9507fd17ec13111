//! Application state management.

use rps_match_core::{JsonFileStore, LedgerError, LocalLedger, MatchHost};
use std::path::Path;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    host: Arc<MatchHost<LocalLedger>>,
}

impl AppState {
    /// Create new state without persistence (for testing)
    pub fn new() -> Self {
        Self::with_ledger(LocalLedger::in_memory())
    }

    /// Create state backed by a JSON snapshot file
    pub fn with_state_file(path: &Path) -> Result<Self, LedgerError> {
        Ok(Self::with_ledger(LocalLedger::open(JsonFileStore::new(path)?)?))
    }

    pub fn with_ledger(ledger: LocalLedger) -> Self {
        Self {
            host: Arc::new(MatchHost::new(ledger)),
        }
    }

    pub fn host(&self) -> &MatchHost<LocalLedger> {
        &self.host
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
