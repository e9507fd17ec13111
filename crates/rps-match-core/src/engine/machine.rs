//! The match state machine.

use super::{MatchError, MatchState, Operation};
use crate::crypto::{Commitment, Nonce};
use crate::games::{judge, Choice};
use crate::protocol::{MatchEvent, Outcome, PrincipalId, Slot};
use serde::{Deserialize, Serialize};

/// A single two-player match.
///
/// Every write operation either applies completely or returns an error
/// and leaves the match untouched. Callers are expected to serialize
/// operations; the match itself holds no locks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    state: MatchState,
    players: [Option<PrincipalId>; 2],
    commitments: [Option<Commitment>; 2],
    revealed: [Option<Choice>; 2],
}

impl Match {
    /// Create an empty match
    pub fn new() -> Self {
        Self::default()
    }

    // Queries

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Both slots; `None` marks an empty slot
    pub fn players(&self) -> [Option<PrincipalId>; 2] {
        self.players
    }

    pub fn player(&self, slot: Slot) -> Option<PrincipalId> {
        self.players[slot.index()]
    }

    pub fn commitment(&self, slot: Slot) -> Option<Commitment> {
        self.commitments[slot.index()]
    }

    pub fn revealed_choice(&self, slot: Slot) -> Option<Choice> {
        self.revealed[slot.index()]
    }

    /// Slot held by `principal`, if any
    pub fn slot_of(&self, principal: PrincipalId) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.players[slot.index()] == Some(principal))
    }

    // Operations

    /// Seat `principal` in the lowest free slot
    pub fn join(&mut self, principal: PrincipalId) -> Result<Slot, MatchError> {
        if self.slot_of(principal).is_some() {
            return Err(MatchError::AlreadyJoined);
        }
        if !self.state.allows(Operation::Join) {
            return Err(MatchError::MatchFull);
        }
        let slot = Slot::ALL
            .into_iter()
            .find(|slot| self.players[slot.index()].is_none())
            .ok_or(MatchError::MatchFull)?;

        self.players[slot.index()] = Some(principal);
        self.state = if self.players.iter().all(Option::is_some) {
            MatchState::CommitPhase
        } else {
            MatchState::Joining
        };
        Ok(slot)
    }

    /// Withdraw the single waiting player
    pub fn leave(&mut self, principal: PrincipalId) -> Result<(), MatchError> {
        let slot = self.seat(principal)?;
        if !self.state.allows(Operation::Leave) {
            return Err(MatchError::NotJoinable);
        }

        self.players[slot.index()] = None;
        self.commitments[slot.index()] = None;
        self.revealed[slot.index()] = None;
        self.state = MatchState::Empty;
        Ok(())
    }

    /// Store the sealed choice for the caller's slot
    pub fn submit_commitment(
        &mut self,
        principal: PrincipalId,
        seal: Commitment,
    ) -> Result<Slot, MatchError> {
        let slot = self.seat(principal)?;
        self.require(Operation::SubmitCommitment)?;
        if self.commitments[slot.index()].is_some() {
            return Err(MatchError::AlreadyCommitted);
        }

        self.commitments[slot.index()] = Some(seal);
        if self.commitments.iter().all(Option::is_some) {
            self.state = MatchState::RevealPhase;
        }
        Ok(slot)
    }

    /// Disclose the caller's choice and nonce, checked against the seal
    pub fn reveal_choice(
        &mut self,
        principal: PrincipalId,
        choice_code: u8,
        nonce: &Nonce,
    ) -> Result<Choice, MatchError> {
        let slot = self.seat(principal)?;
        self.require(Operation::RevealChoice)?;
        if self.revealed[slot.index()].is_some() {
            return Err(MatchError::AlreadyRevealed);
        }
        let choice =
            Choice::try_from(choice_code).map_err(|invalid| MatchError::InvalidChoice(invalid.0))?;
        match self.commitments[slot.index()] {
            Some(seal) if seal.verify(choice, nonce) => {}
            _ => return Err(MatchError::CommitmentMismatch),
        }

        self.revealed[slot.index()] = Some(choice);
        if self.revealed.iter().all(Option::is_some) {
            self.state = MatchState::Settleable;
        }
        Ok(choice)
    }

    /// Decide the winner and reset to an empty match
    pub fn settle(&mut self) -> Result<MatchEvent, MatchError> {
        self.require(Operation::Settle)?;
        let ([Some(first), Some(second)], [Some(first_choice), Some(second_choice)]) =
            (self.players, self.revealed)
        else {
            return Err(self.wrong_state(Operation::Settle));
        };

        let outcome = match judge(first_choice, second_choice).winner() {
            Some(Slot::First) => Outcome::Winner(first),
            Some(Slot::Second) => Outcome::Winner(second),
            None => Outcome::Draw,
        };

        *self = Self::new();
        Ok(MatchEvent::Settled {
            outcome,
            players: [first, second],
            choices: [first_choice, second_choice],
        })
    }

    /// Check that the fields agree with the lifecycle state.
    ///
    /// Used when a match is loaded from outside the engine.
    pub fn is_consistent(&self) -> bool {
        let seated = self.players.iter().filter(|p| p.is_some()).count();
        let committed = self.commitments.iter().filter(|c| c.is_some()).count();
        let revealed = self.revealed.iter().filter(|r| r.is_some()).count();

        if let [Some(a), Some(b)] = self.players {
            if a == b {
                return false;
            }
        }
        for slot in Slot::ALL {
            let i = slot.index();
            if self.commitments[i].is_some() && self.players[i].is_none() {
                return false;
            }
            if self.revealed[i].is_some() && self.commitments[i].is_none() {
                return false;
            }
        }

        match self.state {
            MatchState::Empty => seated == 0 && committed == 0 && revealed == 0,
            MatchState::Joining => seated == 1 && committed == 0 && revealed == 0,
            MatchState::CommitPhase => seated == 2 && committed < 2 && revealed == 0,
            MatchState::RevealPhase => seated == 2 && committed == 2 && revealed < 2,
            MatchState::Settleable => seated == 2 && committed == 2 && revealed == 2,
        }
    }

    fn seat(&self, principal: PrincipalId) -> Result<Slot, MatchError> {
        self.slot_of(principal).ok_or(MatchError::NotAPlayer)
    }

    fn require(&self, operation: Operation) -> Result<(), MatchError> {
        if self.state.allows(operation) {
            Ok(())
        } else {
            Err(self.wrong_state(operation))
        }
    }

    fn wrong_state(&self, operation: Operation) -> MatchError {
        MatchError::WrongState {
            operation,
            state: self.state,
        }
    }
}
