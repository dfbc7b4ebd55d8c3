//! Keys, stems and values

use std::fmt;

/// Length of a trie key in bytes
pub const KEY_SIZE: usize = 32;

/// Length of a stem: every key byte except the suffix
pub const STEM_SIZE: usize = 31;

/// Fan-out of internal nodes and number of value slots per leaf
pub const NODE_WIDTH: usize = 256;

/// The shared prefix grouping up to 256 sibling values under one leaf
pub type Stem = [u8; STEM_SIZE];

/// A stored value
pub type Value = [u8; 32];

/// A 32-byte trie key
///
/// Structurally a 31-byte stem followed by a 1-byte suffix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key([u8; KEY_SIZE]);

impl Key {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Key(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn stem(&self) -> Stem {
        let mut stem = [0u8; STEM_SIZE];
        stem.copy_from_slice(&self.0[..STEM_SIZE]);
        stem
    }

    /// Selects one of the 256 value slots within the stem's leaf
    pub fn suffix(&self) -> u8 {
        self.0[STEM_SIZE]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.to_hex())
    }
}

/// A key/value pair used to populate a trie
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Key,
    pub value: Value,
}
