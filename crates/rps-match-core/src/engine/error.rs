//! Rejections raised by the match engine.

use super::{MatchState, Operation};
use thiserror::Error;

/// Reason an operation was rejected.
///
/// A rejected operation never mutates the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("match already has two players")]
    MatchFull,

    #[error("players can only leave while waiting for an opponent")]
    NotJoinable,

    #[error("{operation} is not allowed while the match is {state}")]
    WrongState {
        operation: Operation,
        state: MatchState,
    },

    #[error("caller does not hold a slot in this match")]
    NotAPlayer,

    #[error("caller has already joined this match")]
    AlreadyJoined,

    #[error("a commitment was already submitted for this slot")]
    AlreadyCommitted,

    #[error("a choice was already revealed for this slot")]
    AlreadyRevealed,

    #[error("invalid choice code {0}")]
    InvalidChoice(u8),

    #[error("revealed choice and nonce do not match the commitment")]
    CommitmentMismatch,
}

impl MatchError {
    /// Stable snake_case name for the rejection kind
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::MatchFull => "match_full",
            MatchError::NotJoinable => "not_joinable",
            MatchError::WrongState { .. } => "wrong_state",
            MatchError::NotAPlayer => "not_a_player",
            MatchError::AlreadyJoined => "already_joined",
            MatchError::AlreadyCommitted => "already_committed",
            MatchError::AlreadyRevealed => "already_revealed",
            MatchError::InvalidChoice(_) => "invalid_choice",
            MatchError::CommitmentMismatch => "commitment_mismatch",
        }
    }
}
