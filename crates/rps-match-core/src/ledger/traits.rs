//! Ledger trait definition.

use crate::engine::Match;
use crate::protocol::{MatchEvent, PrincipalId};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Errors from ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown credential")]
    UnknownCredential,

    #[error("name already registered: {0}")]
    NameTaken(String),

    #[error("ledger lock was poisoned")]
    Poisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted snapshot: {0}")]
    CorruptSnapshot(String),
}

/// Bearer token a principal presents on every call
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Create a new random 32-byte token
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex SHA-256 of the token, the form ledgers keep at rest
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(..)")
    }
}

/// Trait for the host environment the match engine runs in
///
/// The ledger supplies what the engine deliberately does not:
/// - identity: turning a presented credential into a principal
/// - ordering and durability: applying each operation alone and keeping
///   its result
/// - delivery: recording outcome events for observers
pub trait Ledger: Send + Sync {
    /// Resolve the principal behind a credential
    fn authenticate(&self, credential: &Credential) -> Result<PrincipalId, LedgerError>;

    /// Run `op` with exclusive access to the match.
    ///
    /// Any change `op` makes is stored before this returns; if storing
    /// fails the change is discarded.
    fn atomically<R>(&self, op: impl FnOnce(&mut Match) -> R) -> Result<R, LedgerError> {
        self.atomically_emit(|game| (op(game), None))
    }

    /// Like [`Ledger::atomically`], but `op` may also produce an event.
    ///
    /// The match change and the event are stored together: either both
    /// are kept or neither is.
    fn atomically_emit<R>(
        &self,
        op: impl FnOnce(&mut Match) -> (R, Option<MatchEvent>),
    ) -> Result<R, LedgerError>;

    /// Record an event for observers
    fn emit(&self, event: MatchEvent) -> Result<(), LedgerError>;

    /// Copy of the current match
    fn snapshot(&self) -> Result<Match, LedgerError>;
}
