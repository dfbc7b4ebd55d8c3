//! One analysis run: populate, commit, measure

use super::histogram::DepthHistogram;
use super::locate::locate_depth;
use super::proof_size::estimate_proof_size;
use super::report::{AnalysisReport, KeyReport};
use crate::model::KeyValue;
use crate::trie::{TrieEngine, VerkleNode};
use crate::{Error, Result};
use tracing::{debug, info};

/// Populate `engine` with `items` and analyze the resulting trie
///
/// Fails fast: the first engine error or opaque node aborts the run and
/// no partial report is produced.
pub fn analyze<E: TrieEngine>(engine: &mut E, items: &[KeyValue]) -> Result<AnalysisReport> {
    info!(items = items.len(), "populating trie");
    for item in items {
        engine.insert(item.key, item.value, None)?;
    }
    let root = engine.commit();
    info!(root = %root.short(), "committed trie");

    let mut keys = Vec::with_capacity(items.len());
    for item in items {
        let proof = engine.build_inclusion_proof(&[item.key])?;
        let (serialized, _) = engine.serialize_proof(&proof)?;
        let depth = locate_depth(engine.root(), &item.key)?;
        let proof_size = estimate_proof_size(&serialized);

        debug!(key = %item.key, ?depth, proof_size, "located key");
        keys.push(KeyReport {
            key: item.key,
            depth,
            proof_size,
            encoded_size: serialized.encoded_len()?,
        });
    }

    let histogram = DepthHistogram::from_root(engine.root())?;

    let nodes = match engine.root() {
        VerkleNode::Internal(root) => engine.batch_serialize_subtree(root)?,
        VerkleNode::Leaf(_) => Vec::new(),
        VerkleNode::Opaque(commitment) => {
            return Err(Error::UnexpectedOpaqueNode {
                depth: 0,
                commitment: *commitment,
            })
        }
    };
    let storage_bytes = nodes.iter().map(|node| node.storage_size()).sum();
    info!(nodes = nodes.len(), storage_bytes, "serialized trie");

    Ok(AnalysisReport {
        root,
        keys,
        histogram,
        node_count: nodes.len(),
        storage_bytes,
    })
}
