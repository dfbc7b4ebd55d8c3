//! The trie engine contract consumed by the analysis layer

use super::node::{InternalNode, VerkleNode};
use super::proof::{Proof, StateDiff, VerkleProof};
use super::serialize::SerializedNode;
use crate::model::{Commitment, Key, Value};
use thiserror::Error;

/// Expands an opaque subtree given the key bytes leading to it
pub type NodeResolver<'a> = &'a dyn Fn(&[u8]) -> Option<VerkleNode>;

/// Errors raised while inserting into a trie
#[derive(Error, Debug)]
pub enum InsertError {
    #[error("Missing node at path {path}: subtree is opaque and could not be resolved")]
    MissingNode { path: String },
}

/// Errors raised while building an inclusion proof
#[derive(Error, Debug)]
pub enum ProofError {
    #[error("Trie must be committed before building a proof")]
    Uncommitted,

    #[error("No keys requested")]
    EmptyKeySet,

    #[error("Opaque node on proof path at depth {depth}")]
    OpaqueOnPath { depth: usize },
}

/// Errors raised while serializing proofs or nodes
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Node at depth {depth} has no commitment")]
    Uncommitted { depth: usize },

    #[error("Proof has {keys} keys but {values} values")]
    Mismatch { keys: usize, values: usize },

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

/// A committed key/value trie able to produce proofs
///
/// Implementations own insertion, commitment and proof generation. The
/// analysis layer only reads the tree through [`TrieEngine::root`].
pub trait TrieEngine {
    /// Insert or overwrite a value. `resolver` expands opaque subtrees met
    /// along the key's path.
    fn insert(
        &mut self,
        key: Key,
        value: Value,
        resolver: Option<NodeResolver<'_>>,
    ) -> Result<(), InsertError>;

    /// Commit pending changes and return the root commitment
    fn commit(&mut self) -> Commitment;

    /// The root node; always an internal node for a Verkle trie
    fn root(&self) -> &VerkleNode;

    /// Build a multi-key inclusion (or absence) proof
    fn build_inclusion_proof(&self, keys: &[Key]) -> Result<Proof, ProofError>;

    /// Convert a proof to its serializable form plus the touched state
    fn serialize_proof(&self, proof: &Proof) -> Result<(VerkleProof, StateDiff), SerializeError>;

    /// Serialize every expanded node of a subtree, depth-first
    fn batch_serialize_subtree(
        &self,
        root: &InternalNode,
    ) -> Result<Vec<SerializedNode>, SerializeError>;
}
