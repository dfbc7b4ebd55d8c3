//! In-memory Verkle trie engine

use super::engine::{InsertError, NodeResolver, ProofError, SerializeError, TrieEngine};
use super::node::{InternalNode, LeafNode, VerkleNode};
use super::proof::{self, Proof, StateDiff, VerkleProof};
use super::serialize::{self, SerializedNode};
use crate::model::{Commitment, Key, KeyValue, Value};
use tracing::debug;

/// A Verkle trie held entirely in memory
///
/// The root is an internal node at depth 0. A leaf sits at the first
/// depth where its stem differs from every other stem, so the number of
/// internal nodes above a leaf equals the length of the shared prefix
/// plus one.
#[derive(Clone, Debug)]
pub struct MemoryTrie {
    root: VerkleNode,
}

impl MemoryTrie {
    /// Create a new empty trie
    pub fn new() -> Self {
        MemoryTrie {
            root: VerkleNode::Internal(InternalNode::new()),
        }
    }

    /// Build and commit a trie from key/value pairs
    pub fn from_items(items: &[KeyValue]) -> Result<Self, InsertError> {
        let mut trie = MemoryTrie::new();
        for item in items {
            trie.insert(item.key, item.value, None)?;
        }
        trie.commit();
        Ok(trie)
    }

    /// Get a value by key; `None` if absent or behind an opaque node
    pub fn get(&self, key: &Key) -> Option<&Value> {
        let mut node = self.root.as_internal()?;
        for &byte in &key.as_bytes()[..] {
            match node.child(byte)? {
                VerkleNode::Internal(child) => node = child,
                VerkleNode::Leaf(leaf) if leaf.stem() == &key.stem() => {
                    return leaf.value(key.suffix())
                }
                VerkleNode::Leaf(_) | VerkleNode::Opaque(_) => return None,
            }
        }
        None
    }

    /// Collapse committed subtrees at `depth` and below into opaque nodes
    ///
    /// Returns the number of subtrees collapsed. The root is never
    /// collapsed, and nodes without a commitment stay expanded.
    pub fn prune(&mut self, depth: usize) -> usize {
        let depth = depth.max(1);
        let pruned = match &mut self.root {
            VerkleNode::Internal(root) => prune_below(root, 0, depth),
            VerkleNode::Leaf(_) | VerkleNode::Opaque(_) => 0,
        };
        debug!(depth, pruned, "pruned trie");
        pruned
    }
}

impl Default for MemoryTrie {
    fn default() -> Self {
        MemoryTrie::new()
    }
}

impl TrieEngine for MemoryTrie {
    fn insert(
        &mut self,
        key: Key,
        value: Value,
        resolver: Option<NodeResolver<'_>>,
    ) -> Result<(), InsertError> {
        match &mut self.root {
            VerkleNode::Internal(root) => insert_at(root, &key, value, 0, resolver),
            VerkleNode::Leaf(_) | VerkleNode::Opaque(_) => Err(InsertError::MissingNode {
                path: String::new(),
            }),
        }
    }

    fn commit(&mut self) -> Commitment {
        self.root.commit()
    }

    fn root(&self) -> &VerkleNode {
        &self.root
    }

    fn build_inclusion_proof(&self, keys: &[Key]) -> Result<Proof, ProofError> {
        let root = self
            .root
            .as_internal()
            .ok_or(ProofError::OpaqueOnPath { depth: 0 })?;
        proof::build(root, keys)
    }

    fn serialize_proof(&self, proof: &Proof) -> Result<(VerkleProof, StateDiff), SerializeError> {
        proof::serialize(proof)
    }

    fn batch_serialize_subtree(
        &self,
        root: &InternalNode,
    ) -> Result<Vec<SerializedNode>, SerializeError> {
        serialize::batch_serialize(root)
    }
}

fn insert_at(
    node: &mut InternalNode,
    key: &Key,
    value: Value,
    depth: usize,
    resolver: Option<NodeResolver<'_>>,
) -> Result<(), InsertError> {
    let stem = key.stem();
    let slot = node.slot_mut(key.as_bytes()[depth]);

    if matches!(slot.as_ref(), Some(VerkleNode::Opaque(_))) {
        let path = &key.as_bytes()[..=depth];
        let resolved = resolver
            .and_then(|resolve| resolve(path))
            .filter(|node| !node.is_opaque())
            .ok_or_else(|| InsertError::MissingNode {
                path: hex::encode(path),
            })?;
        *slot = Some(resolved);
    }

    // Another stem owns this slot: push it one level down
    if matches!(slot.as_ref(), Some(VerkleNode::Leaf(leaf)) if leaf.stem() != &stem) {
        if let Some(VerkleNode::Leaf(existing)) = slot.take() {
            *slot = Some(VerkleNode::Internal(InternalNode::wrapping(
                existing,
                depth + 1,
            )));
        }
    }

    match slot {
        None => {
            let mut leaf = LeafNode::new(stem);
            leaf.set_value(key.suffix(), value);
            *slot = Some(VerkleNode::Leaf(leaf));
            Ok(())
        }
        Some(VerkleNode::Leaf(leaf)) => {
            leaf.set_value(key.suffix(), value);
            Ok(())
        }
        Some(VerkleNode::Internal(child)) => insert_at(child, key, value, depth + 1, resolver),
        Some(VerkleNode::Opaque(_)) => Err(InsertError::MissingNode {
            path: hex::encode(&key.as_bytes()[..=depth]),
        }),
    }
}

fn prune_below(node: &mut InternalNode, depth: usize, cutoff: usize) -> usize {
    let mut pruned = 0;
    for slot in node.slots_mut() {
        let Some(child) = slot else { continue };
        if depth + 1 >= cutoff {
            if let Some(commitment) = child.commitment() {
                if !child.is_opaque() {
                    *slot = Some(VerkleNode::Opaque(commitment));
                    pruned += 1;
                }
            }
        } else if let VerkleNode::Internal(inner) = child {
            pruned += prune_below(inner, depth + 1, cutoff);
        }
    }
    pruned
}
