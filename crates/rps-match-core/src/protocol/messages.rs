//! Protocol messages.

use crate::crypto::{Commitment, Nonce};
use crate::engine::{Match, MatchState};
use crate::games::Choice;
use crate::protocol::{Outcome, PrincipalId, Slot};
use serde::{Deserialize, Serialize};

/// Register a principal with the ledger
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterMessage {
    pub name: String,
}

/// Seal submission
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitMessage {
    pub commitment: Commitment,
}

/// Reveal of a previously sealed choice.
///
/// `choice` is the raw code so that out-of-range values reach the engine
/// and are rejected there.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevealMessage {
    pub choice: u8,
    pub nonce: Nonce,
}

/// Result of a settlement
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettleMessage {
    pub outcome: Outcome,
}

/// Read-only view of the whole match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub state: MatchState,
    pub players: [Option<PrincipalId>; 2],
    pub commitments: [Option<Commitment>; 2],
    pub revealed: [Option<Choice>; 2],
}

impl From<&Match> for MatchView {
    fn from(game: &Match) -> Self {
        Self {
            state: game.state(),
            players: game.players(),
            commitments: Slot::ALL.map(|slot| game.commitment(slot)),
            revealed: Slot::ALL.map(|slot| game.revealed_choice(slot)),
        }
    }
}

/// Commitment held in one slot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlotCommitment {
    pub slot: usize,
    pub commitment: Option<Commitment>,
}

/// Revealed choice held in one slot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlotChoice {
    pub slot: usize,
    pub choice: Option<Choice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_message_serialization() {
        let msg = RevealMessage {
            choice: 1,
            nonce: Nonce::from_bytes(b"k1".to_vec()),
        };

        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: RevealMessage = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.choice, 1);
        assert_eq!(deserialized.nonce, msg.nonce);
    }

    #[test]
    fn test_empty_match_view() {
        let view = MatchView::from(&Match::new());

        assert_eq!(view.state, MatchState::Empty);
        assert_eq!(view.players, [None, None]);
        assert_eq!(view.commitments, [None, None]);
        assert_eq!(view.revealed, [None, None]);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "empty");
        assert!(json["players"][0].is_null());
    }
}
