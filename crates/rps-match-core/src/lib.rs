//! RPS Match Core Library
//!
//! This crate provides the match lifecycle state machine, the commit-reveal
//! primitives, and the ledger contract for a two-player rock/paper/scissors
//! match whose moves stay hidden until both players are committed.

pub mod crypto;
pub mod engine;
pub mod games;
pub mod host;
pub mod ledger;
pub mod protocol;

pub use crypto::{Commitment, Nonce};
pub use engine::{Match, MatchError, MatchState, Operation};
pub use games::Choice;
pub use host::{HostError, MatchHost};
pub use ledger::{
    Credential, JsonFileStore, Ledger, LedgerError, LocalLedger, MatchStore, MemoryStore,
    Registration,
};
pub use protocol::{GameResult, MatchEvent, Outcome, PrincipalId, Slot};
