//! Commitment digests for trie nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte commitment summarizing a subtree
///
/// The in-memory engine derives these with BLAKE3 over the node contents.
/// A production engine would use Pedersen commitments of the same width.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Commitment of an empty trie
    pub const ZERO: Commitment = Commitment([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Commitment(bytes)
    }

    /// Commit to several byte strings under a one-byte domain tag
    pub fn digest_tagged(tag: u8, parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[tag]);
        for part in parts {
            hasher.update(part);
        }
        Commitment(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 7 hex chars, for log lines
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.short())
    }
}

impl Default for Commitment {
    fn default() -> Self {
        Commitment::ZERO
    }
}

impl AsRef<[u8]> for Commitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
