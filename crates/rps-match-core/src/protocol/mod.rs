//! Protocol types and messages.

mod messages;
mod types;

pub use messages::{
    CommitMessage, MatchView, RegisterMessage, RevealMessage, SettleMessage, SlotChoice,
    SlotCommitment,
};
pub use types::{GameResult, MatchEvent, Outcome, PrincipalId, Slot};
