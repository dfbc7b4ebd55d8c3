//! Per-depth structural statistics of a trie

use crate::trie::VerkleNode;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Counts recorded at one depth
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DepthStats {
    pub internal: usize,
    pub leaves: usize,
    /// Populated value slots of the leaves at this depth
    pub values: usize,
}

impl AddAssign for DepthStats {
    fn add_assign(&mut self, other: Self) {
        self.internal += other.internal;
        self.leaves += other.leaves;
        self.values += other.values;
    }
}

/// Depth → counts accumulator
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthHistogram {
    levels: BTreeMap<usize, DepthStats>,
}

impl DepthHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a trie from its root at depth 0
    pub fn from_root(root: &VerkleNode) -> Result<Self> {
        let mut histogram = DepthHistogram::new();
        scan(root, &mut histogram, 0)?;
        Ok(histogram)
    }

    pub fn get(&self, depth: usize) -> DepthStats {
        self.levels.get(&depth).copied().unwrap_or_default()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.levels.keys().next_back().copied()
    }

    /// One row per depth from 0 to the deepest recorded depth, zero-filled
    pub fn rows(&self) -> Vec<(usize, DepthStats)> {
        match self.max_depth() {
            Some(max) => (0..=max).map(|depth| (depth, self.get(depth))).collect(),
            None => Vec::new(),
        }
    }

    /// Sum over all depths
    pub fn totals(&self) -> DepthStats {
        let mut total = DepthStats::default();
        for stats in self.levels.values() {
            total += *stats;
        }
        total
    }

    /// Fold in a histogram built over a disjoint subtree
    pub fn merge(&mut self, other: &DepthHistogram) {
        for (depth, stats) in &other.levels {
            *self.entry(*depth) += *stats;
        }
    }

    fn entry(&mut self, depth: usize) -> &mut DepthStats {
        self.levels.entry(depth).or_default()
    }
}

/// Classify `node` and everything below it into `histogram`
///
/// Values are counted at their leaf's depth. An opaque node aborts the
/// scan: its contents are unknown, so any counts would be wrong.
pub fn scan(node: &VerkleNode, histogram: &mut DepthHistogram, depth: usize) -> Result<()> {
    match node {
        VerkleNode::Internal(internal) => {
            histogram.entry(depth).internal += 1;
            for (_, child) in internal.occupied() {
                scan(child, histogram, depth + 1)?;
            }
        }
        VerkleNode::Leaf(leaf) => {
            let stats = histogram.entry(depth);
            stats.leaves += 1;
            stats.values += leaf.value_count();
        }
        VerkleNode::Opaque(commitment) => {
            return Err(Error::UnexpectedOpaqueNode {
                depth,
                commitment: *commitment,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::synth::prefixed_items;
    use crate::trie::{MemoryTrie, TrieEngine};

    #[test]
    fn test_empty_trie_has_only_root() {
        let trie = MemoryTrie::new();
        let histogram = DepthHistogram::from_root(trie.root()).unwrap();

        assert_eq!(histogram.max_depth(), Some(0));
        assert_eq!(
            histogram.get(0),
            DepthStats {
                internal: 1,
                leaves: 0,
                values: 0
            }
        );
    }

    #[test]
    fn test_rows_are_zero_filled() {
        let mut histogram = DepthHistogram::new();
        histogram.entry(0).internal = 1;
        histogram.entry(3).leaves = 2;

        let rows = histogram.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], (1, DepthStats::default()));
        assert_eq!(rows[3].1.leaves, 2);
        assert!(DepthHistogram::new().rows().is_empty());
    }

    #[test]
    fn test_values_counted_at_leaf_depth() {
        let items = prefixed_items(&["01", "0200", "0201"]).unwrap();
        let trie = MemoryTrie::from_items(&items).unwrap();
        let histogram = DepthHistogram::from_root(trie.root()).unwrap();

        assert_eq!(histogram.get(1).leaves, 1);
        assert_eq!(histogram.get(1).values, 1);
        assert_eq!(histogram.get(1).internal, 1);
        assert_eq!(histogram.get(2).leaves, 2);
        assert_eq!(histogram.get(2).values, 2);
    }

    #[test]
    fn test_opaque_node_aborts_scan() {
        let items = prefixed_items(&["0100", "0101"]).unwrap();
        let mut trie = MemoryTrie::from_items(&items).unwrap();
        trie.prune(2);

        let err = DepthHistogram::from_root(trie.root()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedOpaqueNode { depth: 2, .. }));
    }

    #[test]
    fn test_merge_adds_per_depth() {
        let mut a = DepthHistogram::new();
        a.entry(1).leaves = 1;
        let mut b = DepthHistogram::new();
        b.entry(1).leaves = 2;
        b.entry(2).values = 5;

        a.merge(&b);
        assert_eq!(a.get(1).leaves, 3);
        assert_eq!(a.get(2).values, 5);
        assert_eq!(a.totals().leaves, 3);
    }
}
