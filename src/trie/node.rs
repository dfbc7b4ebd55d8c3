//! Trie node types

use crate::model::{Commitment, Stem, Value, NODE_WIDTH};

const LEAF_TAG: u8 = 1;
const INTERNAL_TAG: u8 = 2;

/// A node in a Verkle trie
///
/// Every traversal matches all three variants. `Opaque` shows up only
/// where a subtree was collapsed to its commitment, e.g. after
/// [`MemoryTrie::prune`](super::MemoryTrie::prune).
#[derive(Clone, Debug)]
pub enum VerkleNode {
    /// 256 child slots addressed by the next key byte
    Internal(InternalNode),
    /// One stem and its 256 value slots
    Leaf(LeafNode),
    /// A subtree known only by its commitment
    Opaque(Commitment),
}

impl VerkleNode {
    /// The cached commitment, if this node has been committed
    pub fn commitment(&self) -> Option<Commitment> {
        match self {
            VerkleNode::Internal(node) => node.commitment,
            VerkleNode::Leaf(leaf) => leaf.commitment,
            VerkleNode::Opaque(commitment) => Some(*commitment),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, VerkleNode::Opaque(_))
    }

    pub fn as_internal(&self) -> Option<&InternalNode> {
        match self {
            VerkleNode::Internal(node) => Some(node),
            _ => None,
        }
    }

    /// Compute and cache commitments for this node and everything below it
    pub(crate) fn commit(&mut self) -> Commitment {
        match self {
            VerkleNode::Internal(node) => node.commit(),
            VerkleNode::Leaf(leaf) => leaf.commit(),
            VerkleNode::Opaque(commitment) => *commitment,
        }
    }
}

/// An internal node with a fixed array of 256 child slots
#[derive(Clone, Debug)]
pub struct InternalNode {
    children: Box<[Option<VerkleNode>]>,
    commitment: Option<Commitment>,
}

impl InternalNode {
    pub fn new() -> Self {
        InternalNode {
            children: (0..NODE_WIDTH).map(|_| None).collect(),
            commitment: None,
        }
    }

    /// A new internal node at `depth` holding `leaf` in the slot its stem selects
    pub(crate) fn wrapping(leaf: LeafNode, depth: usize) -> Self {
        let mut node = InternalNode::new();
        let index = leaf.stem[depth];
        node.children[index as usize] = Some(VerkleNode::Leaf(leaf));
        node
    }

    /// All 256 slots in index order
    pub fn children(&self) -> &[Option<VerkleNode>] {
        &self.children
    }

    pub fn child(&self, index: u8) -> Option<&VerkleNode> {
        self.children[index as usize].as_ref()
    }

    /// Non-empty slots with their index
    pub fn occupied(&self) -> impl Iterator<Item = (u8, &VerkleNode)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|node| (index as u8, node)))
    }

    pub fn commitment(&self) -> Option<Commitment> {
        self.commitment
    }

    /// Mutable access to a slot; drops the cached commitment
    pub(crate) fn slot_mut(&mut self, index: u8) -> &mut Option<VerkleNode> {
        self.commitment = None;
        &mut self.children[index as usize]
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Option<VerkleNode>> + '_ {
        self.children.iter_mut()
    }

    fn commit(&mut self) -> Commitment {
        if let Some(commitment) = self.commitment {
            return commitment;
        }

        let mut buf = Vec::new();
        for (index, slot) in self.children.iter_mut().enumerate() {
            if let Some(child) = slot {
                buf.push(index as u8);
                buf.extend_from_slice(child.commit().as_bytes());
            }
        }

        let commitment = Commitment::digest_tagged(INTERNAL_TAG, &[&buf]);
        self.commitment = Some(commitment);
        commitment
    }
}

impl Default for InternalNode {
    fn default() -> Self {
        InternalNode::new()
    }
}

/// A leaf grouping up to 256 values under one stem
#[derive(Clone, Debug)]
pub struct LeafNode {
    stem: Stem,
    values: Box<[Option<Value>]>,
    commitment: Option<Commitment>,
}

impl LeafNode {
    pub fn new(stem: Stem) -> Self {
        LeafNode {
            stem,
            values: (0..NODE_WIDTH).map(|_| None).collect(),
            commitment: None,
        }
    }

    pub fn stem(&self) -> &Stem {
        &self.stem
    }

    /// All 256 value slots in suffix order
    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn value(&self, suffix: u8) -> Option<&Value> {
        self.values[suffix as usize].as_ref()
    }

    pub fn value_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn commitment(&self) -> Option<Commitment> {
        self.commitment
    }

    pub(crate) fn set_value(&mut self, suffix: u8, value: Value) {
        self.values[suffix as usize] = Some(value);
        self.commitment = None;
    }

    fn commit(&mut self) -> Commitment {
        if let Some(commitment) = self.commitment {
            return commitment;
        }

        let mut buf = self.stem.to_vec();
        for (suffix, value) in self.values.iter().enumerate() {
            if let Some(value) = value {
                buf.push(suffix as u8);
                buf.extend_from_slice(value);
            }
        }

        let commitment = Commitment::digest_tagged(LEAF_TAG, &[&buf]);
        self.commitment = Some(commitment);
        commitment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::STEM_SIZE;

    #[test]
    fn test_leaf_commitment_deterministic() {
        let mut a = LeafNode::new([1; STEM_SIZE]);
        let mut b = LeafNode::new([1; STEM_SIZE]);
        a.set_value(3, [9; 32]);
        b.set_value(3, [9; 32]);
        assert_eq!(a.commit(), b.commit());
    }

    #[test]
    fn test_set_value_drops_cached_commitment() {
        let mut leaf = LeafNode::new([1; STEM_SIZE]);
        leaf.set_value(0, [1; 32]);
        let before = leaf.commit();
        assert_eq!(leaf.commitment(), Some(before));

        leaf.set_value(1, [2; 32]);
        assert_eq!(leaf.commitment(), None);
        assert_ne!(leaf.commit(), before);
    }

    #[test]
    fn test_wrapping_places_leaf_by_stem_byte() {
        let mut stem = [0u8; STEM_SIZE];
        stem[2] = 0x42;
        let node = InternalNode::wrapping(LeafNode::new(stem), 2);

        assert!(matches!(node.child(0x42), Some(VerkleNode::Leaf(_))));
        assert_eq!(node.occupied().count(), 1);
    }

    #[test]
    fn test_opaque_commitment_is_known() {
        let c = Commitment::digest_tagged(0, &[b"x"]);
        let mut node = VerkleNode::Opaque(c);
        assert_eq!(node.commitment(), Some(c));
        assert_eq!(node.commit(), c);
        assert!(node.is_opaque());
    }
}
