//! Commitment and Nonce for the commit-reveal scheme.

use crate::games::Choice;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Width of the choice field in the sealed encoding.
const CHOICE_WORD_LEN: usize = 32;

/// Caller-chosen secret mixed into a commitment.
///
/// Arbitrary length. It is never stored by the engine; it only travels with
/// the reveal.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(Vec<u8>);

impl Nonce {
    /// Create a new random 32-byte nonce
    pub fn random() -> Self {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.0.len().min(8);
        write!(f, "Nonce({}, len={})", hex::encode(&self.0[..shown]), self.0.len())
    }
}

impl FromStr for Nonce {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(hex::decode(s)?))
    }
}

impl Serialize for Nonce {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(&self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Commitment = SHA-256(choice_word || nonce)
///
/// `choice_word` is the choice code as a 32-byte big-endian word, so every
/// `(choice, nonce)` pair has exactly one encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Seal a choice under a nonce
    pub fn seal(choice: Choice, nonce: &Nonce) -> Self {
        Self(digest(choice.code(), nonce.as_bytes()))
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given choice and nonce produce this commitment
    pub fn verify(&self, choice: Choice, nonce: &Nonce) -> bool {
        *self == Self::seal(choice, nonce)
    }
}

fn digest(code: u8, nonce: &[u8]) -> [u8; 32] {
    let mut word = [0u8; CHOICE_WORD_LEN];
    word[CHOICE_WORD_LEN - 1] = code;

    let mut hasher = Sha256::new();
    hasher.update(word);
    hasher.update(nonce);
    hasher.finalize().into()
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Commitment {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_string().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_verification() {
        let nonce = Nonce::random();
        let commitment = Commitment::seal(Choice::Rock, &nonce);

        assert!(commitment.verify(Choice::Rock, &nonce));
    }

    #[test]
    fn test_different_choices_different_commitments() {
        let nonce = Nonce::random();
        let commitment1 = Commitment::seal(Choice::Rock, &nonce);
        let commitment2 = Commitment::seal(Choice::Paper, &nonce);

        assert_ne!(commitment1, commitment2);
    }

    #[test]
    fn test_different_nonces_different_commitments() {
        let commitment1 = Commitment::seal(Choice::Rock, &Nonce::random());
        let commitment2 = Commitment::seal(Choice::Rock, &Nonce::random());

        assert_ne!(commitment1, commitment2);
    }

    #[test]
    fn test_wrong_choice_fails_verification() {
        let nonce = Nonce::from_bytes(b"k1".to_vec());
        let commitment = Commitment::seal(Choice::Rock, &nonce);

        assert!(!commitment.verify(Choice::Paper, &nonce));
        assert!(!commitment.verify(Choice::Scissors, &nonce));
    }

    #[test]
    fn test_wrong_nonce_fails_verification() {
        let commitment = Commitment::seal(Choice::Rock, &Nonce::from_bytes(b"k1".to_vec()));

        assert!(!commitment.verify(Choice::Rock, &Nonce::from_bytes(b"k2".to_vec())));
        assert!(!commitment.verify(Choice::Rock, &Nonce::from_bytes(b"k1 ".to_vec())));
        assert!(!commitment.verify(Choice::Rock, &Nonce::from_bytes(b"K1".to_vec())));
    }

    #[test]
    fn test_choice_field_is_fixed_width() {
        // A nonce starting with another choice code must not collide with a
        // shorter encoding of that code.
        let nonce = Nonce::from_bytes(vec![0x02, 0xaa]);
        let shifted = Nonce::from_bytes(vec![0xaa]);

        assert_ne!(
            Commitment::seal(Choice::Rock, &nonce),
            Commitment::seal(Choice::Paper, &shifted)
        );
    }

    #[test]
    fn test_seal_matches_packed_encoding() {
        let nonce = Nonce::from_bytes(b"key1".to_vec());
        let mut packed = vec![0u8; 31];
        packed.push(1);
        packed.extend_from_slice(b"key1");
        let expected: [u8; 32] = Sha256::digest(&packed).into();

        assert_eq!(Commitment::seal(Choice::Rock, &nonce).as_bytes(), &expected);
    }

    #[test]
    fn test_empty_nonce_is_allowed() {
        let nonce = Nonce::from_bytes(Vec::new());
        let commitment = Commitment::seal(Choice::Scissors, &nonce);

        assert!(commitment.verify(Choice::Scissors, &nonce));
    }

    #[test]
    fn test_commitment_hex_serde() {
        let commitment = Commitment::seal(Choice::Paper, &Nonce::random());
        let json = serde_json::to_string(&commitment).unwrap();

        assert_eq!(json, format!("\"{}\"", commitment));
        let decoded: Commitment = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, commitment);
    }

    #[test]
    fn test_commitment_rejects_short_hex() {
        assert!("abcd".parse::<Commitment>().is_err());
        assert!(serde_json::from_str::<Commitment>("\"zz\"").is_err());
    }

    #[test]
    fn test_nonce_hex_serde() {
        let nonce = Nonce::from_bytes(b"k2".to_vec());
        let json = serde_json::to_string(&nonce).unwrap();

        assert_eq!(json, "\"6b32\"");
        assert_eq!(serde_json::from_str::<Nonce>(&json).unwrap(), nonce);
    }
}
