//! Verkle trie engine
//!
//! The analysis layer treats the trie as a collaborator behind
//! [`TrieEngine`]. [`MemoryTrie`] is the in-memory implementation:
//! - Internal nodes fan out 256 ways on successive key bytes
//! - A leaf holds one 31-byte stem and its 256 value slots
//! - Subtrees can be collapsed to opaque commitments and resolved back

mod engine;
mod node;
mod proof;
mod serialize;
mod tree;

pub use engine::{InsertError, NodeResolver, ProofError, SerializeError, TrieEngine};
pub use node::{InternalNode, LeafNode, VerkleNode};
pub use proof::{
    extension_status, IpaProof, MultiPointProof, Proof, StateDiff, StemStateDiff,
    SuffixStateDiff, VerkleProof, EXT_STATUS_ABSENT_EMPTY, EXT_STATUS_ABSENT_OTHER,
    EXT_STATUS_PRESENT, IPA_PROOF_SIZE, IPA_ROUNDS,
};
pub use serialize::SerializedNode;
pub use tree::MemoryTrie;
