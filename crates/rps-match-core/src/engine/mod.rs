//! Match engine: lifecycle state machine, rejection types, and state gating.

mod error;
mod machine;
mod state;

pub use error::MatchError;
pub use machine::Match;
pub use state::{MatchState, Operation};
