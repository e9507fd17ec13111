//! Rock-Paper-Scissors choices and the winner rule.

use crate::protocol::GameResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A revealed Rock-Paper-Scissors choice.
///
/// Codes match the wire encoding: `1 = Rock`, `2 = Paper`, `3 = Scissors`.
/// Code `0` is reserved for "not yet revealed" and is never a valid choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

/// A choice code outside `1..=3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("invalid choice code {0}")]
pub struct InvalidChoiceCode(pub u8);

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Numeric code used in the sealed encoding
    pub fn code(&self) -> u8 {
        match self {
            Choice::Rock => 1,
            Choice::Paper => 2,
            Choice::Scissors => 3,
        }
    }

    /// Check if this choice beats the other
    pub fn beats(&self, other: &Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Scissors, Choice::Paper)
                | (Choice::Paper, Choice::Rock)
        )
    }
}

impl TryFrom<u8> for Choice {
    type Error = InvalidChoiceCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Choice::Rock),
            2 => Ok(Choice::Paper),
            3 => Ok(Choice::Scissors),
            other => Err(InvalidChoiceCode(other)),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Rock => write!(f, "rock"),
            Choice::Paper => write!(f, "paper"),
            Choice::Scissors => write!(f, "scissors"),
        }
    }
}

/// Decide a round between the first and second slot's choices
pub fn judge(first: Choice, second: Choice) -> GameResult {
    if first == second {
        GameResult::Draw
    } else if first.beats(&second) {
        GameResult::FirstWins
    } else {
        GameResult::SecondWins
    }
}
