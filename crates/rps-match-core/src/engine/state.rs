//! Lifecycle states and the operations they gate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Match lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// No players
    #[default]
    Empty,
    /// One player waiting for an opponent
    Joining,
    /// Two players, awaiting sealed choices
    CommitPhase,
    /// Both seals received, awaiting reveals
    RevealPhase,
    /// Both choices revealed, awaiting settlement
    Settleable,
}

impl MatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchState::Empty => "empty",
            MatchState::Joining => "joining",
            MatchState::CommitPhase => "commit_phase",
            MatchState::RevealPhase => "reveal_phase",
            MatchState::Settleable => "settleable",
        }
    }

    /// Whether `operation` may run in this state
    pub fn allows(&self, operation: Operation) -> bool {
        matches!(
            (self, operation),
            (MatchState::Empty, Operation::Join)
                | (MatchState::Joining, Operation::Join)
                | (MatchState::Joining, Operation::Leave)
                | (MatchState::CommitPhase, Operation::SubmitCommitment)
                | (MatchState::RevealPhase, Operation::RevealChoice)
                | (MatchState::Settleable, Operation::Settle)
        )
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Write operations on a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Join,
    Leave,
    SubmitCommitment,
    RevealChoice,
    Settle,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Join => "join",
            Operation::Leave => "leave",
            Operation::SubmitCommitment => "submit_commitment",
            Operation::RevealChoice => "reveal_choice",
            Operation::Settle => "settle",
        };
        write!(f, "{}", name)
    }
}
