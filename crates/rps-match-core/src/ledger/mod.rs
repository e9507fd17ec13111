//! Ledger abstraction: identity, ordering, persistence and event delivery.

mod local;
mod store;
mod traits;

pub use local::{LocalLedger, Registration};
pub use store::{JsonFileStore, LedgerSnapshot, MatchStore, MemoryStore, PrincipalRecord};
pub use traits::{Credential, Ledger, LedgerError};
