//! Depth at which a key's value is stored

use crate::model::{Key, Stem};
use crate::trie::VerkleNode;
use crate::{Error, Result};

/// Find the depth of the leaf holding `key`'s value, searching from `root`
///
/// Returns `Ok(None)` when the key is not stored. Children are searched in
/// index order and the first hit wins.
///
/// Precondition: a stem lives in at most one subtree. This is how the trie
/// engine builds tries and is not checked here; if an engine ever aliased
/// stems, the first subtree in index order would shadow later ones.
pub fn locate_depth(root: &VerkleNode, key: &Key) -> Result<Option<usize>> {
    locate_from(root, &key.stem(), key.suffix(), 0)
}

/// [`locate_depth`] starting at an arbitrary node and depth
pub fn locate_from(
    node: &VerkleNode,
    stem: &Stem,
    suffix: u8,
    depth: usize,
) -> Result<Option<usize>> {
    match node {
        VerkleNode::Leaf(leaf) => {
            // A different stem here means the key is absent from the whole trie
            if leaf.stem() == stem && leaf.value(suffix).is_some() {
                Ok(Some(depth))
            } else {
                Ok(None)
            }
        }
        VerkleNode::Internal(internal) => {
            for (_, child) in internal.occupied() {
                if let Some(found) = locate_from(child, stem, suffix, depth + 1)? {
                    return Ok(Some(found));
                }
            }
            Ok(None)
        }
        VerkleNode::Opaque(commitment) => Err(Error::UnexpectedOpaqueNode {
            depth,
            commitment: *commitment,
        }),
    }
}

/// Like [`locate_depth`], but only follows the child selected by the next
/// stem byte, so it costs one step per level
pub fn locate_depth_indexed(root: &VerkleNode, key: &Key) -> Result<Option<usize>> {
    let stem = key.stem();
    let mut node = root;
    let mut depth = 0;

    loop {
        match node {
            VerkleNode::Leaf(leaf) => {
                let found = leaf.stem() == &stem && leaf.value(key.suffix()).is_some();
                return Ok(found.then_some(depth));
            }
            VerkleNode::Internal(internal) => {
                let Some(&byte) = stem.get(depth) else {
                    return Ok(None);
                };
                match internal.child(byte) {
                    Some(child) => {
                        node = child;
                        depth += 1;
                    }
                    None => return Ok(None),
                }
            }
            VerkleNode::Opaque(commitment) => {
                return Err(Error::UnexpectedOpaqueNode {
                    depth,
                    commitment: *commitment,
                });
            }
        }
    }
}
