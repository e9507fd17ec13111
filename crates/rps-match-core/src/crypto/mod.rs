//! Cryptographic primitives for the commit-reveal scheme.
//!
//! This module provides:
//! - Commitment, the sealed digest a player submits before revealing
//! - Nonce, the caller-chosen secret that keeps the seal hiding

mod commitment;

pub use commitment::{Commitment, Nonce};
