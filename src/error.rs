//! Error types for verkle_analysis

use crate::model::Commitment;
use crate::trie::{InsertError, ProofError, SerializeError};
use thiserror::Error;

/// Result type alias for verkle_analysis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during an analysis run
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid hex prefix {prefix:?}: {source}")]
    Decode {
        prefix: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Prefix {prefix:?} decodes to {len} bytes, more than a 32-byte key")]
    PrefixTooLong { prefix: String, len: usize },

    #[error("Unexpected opaque node at depth {depth} (commitment {commitment})")]
    UnexpectedOpaqueNode { depth: usize, commitment: Commitment },

    #[error("Insert error: {0}")]
    Insert(#[from] InsertError),

    #[error("Proof error: {0}")]
    Proof(#[from] ProofError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}
