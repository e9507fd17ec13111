//! Single-process ledger for hosting one match.

use super::store::{LedgerSnapshot, MatchStore, MemoryStore, PrincipalRecord};
use super::traits::{Credential, Ledger, LedgerError};
use crate::engine::Match;
use crate::protocol::{MatchEvent, PrincipalId};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Returned once when a principal registers; the credential is not kept
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registration {
    pub principal_id: PrincipalId,
    pub name: String,
    pub token: Credential,
}

/// In-process ledger.
///
/// A mutex around the whole snapshot gives every call a total order.
/// Each mutation is written to the store before it becomes visible.
pub struct LocalLedger {
    inner: Mutex<LedgerSnapshot>,
    store: Box<dyn MatchStore>,
}

impl LocalLedger {
    /// Open a ledger over `store`, resuming from its last snapshot
    pub fn open(store: impl MatchStore + 'static) -> Result<Self, LedgerError> {
        let snapshot = store.load()?.unwrap_or_default();
        tracing::info!(
            "Ledger opened: match {}, {} principals, {} events",
            snapshot.game.state(),
            snapshot.principals.len(),
            snapshot.events.len()
        );
        Ok(Self {
            inner: Mutex::new(snapshot),
            store: Box::new(store),
        })
    }

    /// Ledger with no durability
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(LedgerSnapshot::default()),
            store: Box::new(MemoryStore::new()),
        }
    }

    /// Register a new principal under a unique name
    pub fn register(&self, name: impl Into<String>) -> Result<Registration, LedgerError> {
        let name = name.into();
        let token = Credential::random();

        self.commit(|next| {
            if next.principals.iter().any(|p| p.name == name) {
                return Err(LedgerError::NameTaken(name.clone()));
            }
            let id = PrincipalId::new();
            next.principals.push(PrincipalRecord {
                id,
                name: name.clone(),
                credential_digest: token.digest(),
            });
            Ok(id)
        })
        .map(|principal_id| {
            tracing::info!("Registered principal {} as {:?}", principal_id, name);
            Registration {
                principal_id,
                name,
                token,
            }
        })
    }

    /// All emitted events, oldest first
    pub fn events(&self) -> Result<Vec<MatchEvent>, LedgerError> {
        Ok(self.lock()?.events.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerSnapshot>, LedgerError> {
        self.inner.lock().map_err(|_| LedgerError::Poisoned)
    }

    /// Apply `change` to a copy of the snapshot, store it, then publish it.
    ///
    /// Nothing is stored or published when `change` fails.
    fn commit<R>(
        &self,
        change: impl FnOnce(&mut LedgerSnapshot) -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        let mut inner = self.lock()?;
        let mut next = inner.clone();
        let result = change(&mut next)?;
        if next != *inner {
            self.store.save(&next)?;
            *inner = next;
        }
        Ok(result)
    }
}

impl Ledger for LocalLedger {
    fn authenticate(&self, credential: &Credential) -> Result<PrincipalId, LedgerError> {
        let digest = credential.digest();
        self.lock()?
            .principals
            .iter()
            .find(|p| p.credential_digest == digest)
            .map(|p| p.id)
            .ok_or(LedgerError::UnknownCredential)
    }

    fn atomically_emit<R>(
        &self,
        op: impl FnOnce(&mut Match) -> (R, Option<MatchEvent>),
    ) -> Result<R, LedgerError> {
        self.commit(|next| {
            let (result, event) = op(&mut next.game);
            if let Some(event) = event {
                tracing::info!("Match event: {:?}", event);
                next.events.push(event);
            }
            Ok(result)
        })
    }

    fn emit(&self, event: MatchEvent) -> Result<(), LedgerError> {
        tracing::info!("Match event: {:?}", event);
        self.commit(|next| {
            next.events.push(event);
            Ok(())
        })
    }

    fn snapshot(&self) -> Result<Match, LedgerError> {
        Ok(self.lock()?.game.clone())
    }
}
