//! Node serialization for storage-size accounting

use super::engine::SerializeError;
use super::node::{InternalNode, LeafNode, VerkleNode};
use crate::model::{Commitment, Stem, Value, NODE_WIDTH};
use serde::{Deserialize, Serialize};

/// One serialized node and the commitment it is stored under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedNode {
    pub commitment: Commitment,
    pub bytes: Vec<u8>,
}

impl SerializedNode {
    /// Bytes needed to store this node keyed by its commitment
    pub fn storage_size(&self) -> usize {
        32 + self.bytes.len()
    }
}

/// Storage record of a node: occupied slots as a bitmap plus their payloads
#[derive(Debug, Serialize, Deserialize)]
enum NodeRecord {
    Internal {
        bitmap: [u8; NODE_WIDTH / 8],
        children: Vec<Commitment>,
    },
    Leaf {
        stem: Stem,
        bitmap: [u8; NODE_WIDTH / 8],
        values: Vec<Value>,
    },
}

fn set_bit(bitmap: &mut [u8; NODE_WIDTH / 8], index: usize) {
    bitmap[index / 8] |= 1 << (index % 8);
}

pub(crate) fn batch_serialize(root: &InternalNode) -> Result<Vec<SerializedNode>, SerializeError> {
    let mut out = Vec::new();
    serialize_internal(root, 0, &mut out)?;
    Ok(out)
}

fn serialize_internal(
    node: &InternalNode,
    depth: usize,
    out: &mut Vec<SerializedNode>,
) -> Result<(), SerializeError> {
    let commitment = node
        .commitment()
        .ok_or(SerializeError::Uncommitted { depth })?;

    let mut bitmap = [0u8; NODE_WIDTH / 8];
    let mut children = Vec::new();
    for (index, child) in node.occupied() {
        let child_commitment = child
            .commitment()
            .ok_or(SerializeError::Uncommitted { depth: depth + 1 })?;
        set_bit(&mut bitmap, index as usize);
        children.push(child_commitment);
    }

    let record = NodeRecord::Internal { bitmap, children };
    out.push(SerializedNode {
        commitment,
        bytes: bincode::serialize(&record)?,
    });

    for (_, child) in node.occupied() {
        match child {
            VerkleNode::Internal(inner) => serialize_internal(inner, depth + 1, out)?,
            VerkleNode::Leaf(leaf) => serialize_leaf(leaf, depth + 1, out)?,
            // Collapsed subtrees are already stored under their commitment
            VerkleNode::Opaque(_) => {}
        }
    }
    Ok(())
}

fn serialize_leaf(
    leaf: &LeafNode,
    depth: usize,
    out: &mut Vec<SerializedNode>,
) -> Result<(), SerializeError> {
    let commitment = leaf
        .commitment()
        .ok_or(SerializeError::Uncommitted { depth })?;

    let mut bitmap = [0u8; NODE_WIDTH / 8];
    let mut values = Vec::new();
    for (suffix, value) in leaf.values().iter().enumerate() {
        if let Some(value) = value {
            set_bit(&mut bitmap, suffix);
            values.push(*value);
        }
    }

    let record = NodeRecord::Leaf {
        stem: *leaf.stem(),
        bitmap,
        values,
    };
    out.push(SerializedNode {
        commitment,
        bytes: bincode::serialize(&record)?,
    });
    Ok(())
}
