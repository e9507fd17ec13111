//! Protocol types.

use crate::games::Choice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Authenticated caller identity, assigned by the ledger
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Create a new random principal ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrincipalId({})", self.0)
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two fixed player positions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    /// Slot at a zero-based index
    pub fn from_index(index: usize) -> Option<Slot> {
        match index {
            0 => Some(Slot::First),
            1 => Some(Slot::Second),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Round result by slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    FirstWins,
    SecondWins,
    Draw,
}

impl GameResult {
    /// Winning slot, if any
    pub fn winner(&self) -> Option<Slot> {
        match self {
            GameResult::FirstWins => Some(Slot::First),
            GameResult::SecondWins => Some(Slot::Second),
            GameResult::Draw => None,
        }
    }
}

/// Settled match outcome, by principal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "winner", rename_all = "snake_case")]
pub enum Outcome {
    Winner(PrincipalId),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(principal) => write!(f, "winner: {}", principal),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Observable event produced by the match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    Settled {
        outcome: Outcome,
        players: [PrincipalId; 2],
        choices: [Choice; 2],
    },
}

impl MatchEvent {
    pub fn outcome(&self) -> Outcome {
        match self {
            MatchEvent::Settled { outcome, .. } => *outcome,
        }
    }
}
