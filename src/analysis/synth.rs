//! Synthetic key/value generation
//!
//! Two ways to shape a trie:
//! - fixed hex prefixes padded with `0xff`, which pins the depth at which
//!   keys diverge to the prefix boundary
//! - a Keccak-256 chain over a random seed, which spreads keys uniformly

use crate::model::{Key, KeyValue, Value, KEY_SIZE};
use crate::{Error, Result};
use rand::Rng;
use sha3::{Digest, Keccak256};

/// Byte used to pad a decoded prefix up to a full key
pub const FILL_BYTE: u8 = 0xff;

/// Label hashed to produce the value stored under every synthetic key
pub const VALUE_LABEL: &[u8] = b"valWith32bytes";

/// Where the keys of an analysis run come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySource {
    /// One key per hex prefix, padded with [`FILL_BYTE`]
    Prefixes(Vec<String>),
    /// `count` hashed keys; a fresh seed is drawn when `seed` is `None`
    Random { count: usize, seed: Option<[u8; 32]> },
}

impl KeySource {
    pub fn synthesize(&self) -> Result<Vec<KeyValue>> {
        match self {
            KeySource::Prefixes(prefixes) => prefixed_items(prefixes),
            KeySource::Random { count, seed: None } => Ok(random_items(*count)),
            KeySource::Random {
                count,
                seed: Some(seed),
            } => Ok(random_items_with_seed(*seed, *count)),
        }
    }
}

pub fn keccak256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// The value stored under every synthetic key
pub fn constant_value() -> Value {
    keccak256(&[VALUE_LABEL])
}

/// Decode a hex prefix and pad it to a full key
pub fn key_from_prefix(prefix: &str) -> Result<Key> {
    let digits = prefix.strip_prefix("0x").unwrap_or(prefix);
    let decoded = hex::decode(digits).map_err(|source| Error::Decode {
        prefix: prefix.to_string(),
        source,
    })?;
    if decoded.len() > KEY_SIZE {
        return Err(Error::PrefixTooLong {
            prefix: prefix.to_string(),
            len: decoded.len(),
        });
    }

    let mut bytes = [FILL_BYTE; KEY_SIZE];
    bytes[..decoded.len()].copy_from_slice(&decoded);
    Ok(Key::from_bytes(bytes))
}

pub fn prefixed_items<S: AsRef<str>>(prefixes: &[S]) -> Result<Vec<KeyValue>> {
    let value = constant_value();
    prefixes
        .iter()
        .map(|prefix| {
            Ok(KeyValue {
                key: key_from_prefix(prefix.as_ref())?,
                value,
            })
        })
        .collect()
}

/// `count` keys derived from a freshly drawn seed; not reproducible across runs
pub fn random_items(count: usize) -> Vec<KeyValue> {
    let mut seed = [0u8; 32];
    rand::rng().fill(&mut seed);
    random_items_with_seed(seed, count)
}

/// Key `i` is `keccak256(seed || decimal(i))`
pub fn random_items_with_seed(seed: [u8; 32], count: usize) -> Vec<KeyValue> {
    let value = constant_value();
    (0..count)
        .map(|i| KeyValue {
            key: Key::from_bytes(keccak256(&[&seed, i.to_string().as_bytes()])),
            value,
        })
        .collect()
}
