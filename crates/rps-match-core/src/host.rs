//! Drives match operations through a ledger.
//!
//! Every write goes: authenticate the caller, then apply the engine
//! operation under the ledger's exclusive access. Settlement stores the
//! reset match and its outcome event in the same write.

use crate::crypto::{Commitment, Nonce};
use crate::engine::{Match, MatchError};
use crate::games::Choice;
use crate::ledger::{Credential, Ledger, LedgerError};
use crate::protocol::{MatchEvent, MatchView, Outcome, PrincipalId, Slot};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from hosted match operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// A match engine bound to its ledger
pub struct MatchHost<L> {
    ledger: L,
}

impl<L: Ledger> MatchHost<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn join(&self, credential: &Credential) -> Result<Slot, HostError> {
        let (principal, slot) = self.apply(credential, |game, principal| game.join(principal))?;
        info!("Principal {} joined in slot {}", principal, slot);
        Ok(slot)
    }

    pub fn leave(&self, credential: &Credential) -> Result<(), HostError> {
        let (principal, ()) = self.apply(credential, |game, principal| game.leave(principal))?;
        info!("Principal {} left the match", principal);
        Ok(())
    }

    pub fn submit_commitment(
        &self,
        credential: &Credential,
        seal: Commitment,
    ) -> Result<Slot, HostError> {
        let (principal, slot) = self.apply(credential, |game, principal| {
            game.submit_commitment(principal, seal)
        })?;
        info!("Principal {} committed {:?} in slot {}", principal, seal, slot);
        Ok(slot)
    }

    pub fn reveal_choice(
        &self,
        credential: &Credential,
        choice_code: u8,
        nonce: &Nonce,
    ) -> Result<Choice, HostError> {
        let (principal, choice) = self.apply(credential, |game, principal| {
            game.reveal_choice(principal, choice_code, nonce)
        })?;
        info!("Principal {} revealed {}", principal, choice);
        Ok(choice)
    }

    /// Settle the match. Any authenticated principal may call this.
    ///
    /// If the ledger cannot store the outcome event, the match stays
    /// settleable and the call can be retried.
    pub fn settle(&self, credential: &Credential) -> Result<Outcome, HostError> {
        let (principal, outcome) = self.apply_emitting(credential, |game, _| {
            let event = game.settle()?;
            Ok((event.outcome(), Some(event)))
        })?;
        info!("Principal {} settled the match: {}", principal, outcome);
        Ok(outcome)
    }

    /// Read-only view of the current match
    pub fn view(&self) -> Result<MatchView, HostError> {
        Ok(MatchView::from(&self.ledger.snapshot()?))
    }

    fn apply<R>(
        &self,
        credential: &Credential,
        op: impl FnOnce(&mut Match, PrincipalId) -> Result<R, MatchError>,
    ) -> Result<(PrincipalId, R), HostError> {
        self.apply_emitting(credential, |game, principal| {
            op(game, principal).map(|result| (result, None))
        })
    }

    fn apply_emitting<R>(
        &self,
        credential: &Credential,
        op: impl FnOnce(&mut Match, PrincipalId) -> Result<(R, Option<MatchEvent>), MatchError>,
    ) -> Result<(PrincipalId, R), HostError> {
        let principal = self.ledger.authenticate(credential)?;
        let applied = self
            .ledger
            .atomically_emit(|game| match op(game, principal) {
                Ok((result, event)) => (Ok(result), event),
                Err(rejection) => (Err(rejection), None),
            })?;
        match applied {
            Ok(result) => Ok((principal, result)),
            Err(rejection) => {
                warn!("Rejected call from {}: {}", principal, rejection);
                Err(rejection.into())
            }
        }
    }
}
