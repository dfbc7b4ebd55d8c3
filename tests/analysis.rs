//! Structural properties of the analysis over tries built by MemoryTrie
//!
//! Run with:
//! ```bash
//! cargo test --test analysis
//! ```

use std::collections::BTreeSet;
use verkle_analysis::analysis::{
    analyze, estimate_proof_size, key_from_prefix, locate_depth, locate_depth_indexed,
    prefixed_items, random_items_with_seed, scan, DepthHistogram,
};
use verkle_analysis::trie::{TrieEngine, VerkleNode};
use verkle_analysis::{Error, Key, KeyValue, MemoryTrie};

const SIMPLE: [&str; 4] = ["a711355f", "a77d337f", "a7f9365f", "a77d397f"];

fn distinct_stems(items: &[KeyValue]) -> usize {
    items
        .iter()
        .map(|item| item.key.stem())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Internal nodes passed on the way from the root to `key`'s leaf
fn internal_hops(root: &VerkleNode, key: &Key) -> usize {
    let mut hops = 0;
    let mut node = root;
    while let VerkleNode::Internal(internal) = node {
        hops += 1;
        match internal.child(key.as_bytes()[hops - 1]) {
            Some(child) => node = child,
            None => break,
        }
    }
    hops
}

// ============================================================================
// Four-key shape
// ============================================================================

#[test]
fn test_simple_shape_histogram() {
    let items = prefixed_items(&SIMPLE).unwrap();
    let trie = MemoryTrie::from_items(&items).unwrap();
    let histogram = DepthHistogram::from_root(trie.root()).unwrap();

    // root, a7, a77d
    let rows = histogram.rows();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().any(|(_, stats)| stats.internal >= 1));
    assert_eq!(histogram.get(0).internal, 1);
    assert_eq!(histogram.get(1).internal, 1);
    assert_eq!(histogram.get(2).internal, 1);
    assert_eq!(histogram.get(2).leaves, 2);
    assert_eq!(histogram.get(3).leaves, 2);

    let totals = histogram.totals();
    assert_eq!(totals.leaves, distinct_stems(&items));
    assert_eq!(totals.leaves, 4);
    assert_eq!(totals.values, 4);
}

#[test]
fn test_simple_shape_depths() {
    let items = prefixed_items(&SIMPLE).unwrap();
    let trie = MemoryTrie::from_items(&items).unwrap();

    let depths: Vec<_> = items
        .iter()
        .map(|item| locate_depth(trie.root(), &item.key).unwrap())
        .collect();
    assert_eq!(depths, vec![Some(2), Some(3), Some(2), Some(3)]);
}

#[test]
fn test_simple_shape_report() {
    let items = prefixed_items(&SIMPLE).unwrap();
    let mut trie = MemoryTrie::new();
    let report = analyze(&mut trie, &items).unwrap();

    assert_eq!(report.keys.len(), 4);
    for entry in &report.keys {
        let depth = entry.depth.unwrap();
        let proof = trie.build_inclusion_proof(&[entry.key]).unwrap();
        let (serialized, diff) = trie.serialize_proof(&proof).unwrap();

        // one commitment per node below the root on the path
        assert_eq!(serialized.commitments_by_path.len(), depth);
        assert!(serialized.other_stems.is_empty());
        assert_eq!(serialized.depth_extension_present.len(), 1);
        assert_eq!(entry.proof_size, estimate_proof_size(&serialized));
        assert_eq!(entry.proof_size, 32 * depth + 1 + 32 + 17 * 32);
        assert_eq!(diff.len(), 1);
        assert!(diff[0].suffix_diffs[0].current_value.is_some());
    }
    // 3 internal nodes + 4 leaves
    assert_eq!(report.node_count, 7);
}

// ============================================================================
// Random keys
// ============================================================================

#[test]
fn test_random_keys_leaf_count_matches_stems() {
    let items = random_items_with_seed([7; 32], 500);
    let trie = MemoryTrie::from_items(&items).unwrap();
    let histogram = DepthHistogram::from_root(trie.root()).unwrap();

    assert_eq!(histogram.totals().leaves, distinct_stems(&items));
    assert_eq!(histogram.totals().values, items.len());
    assert_eq!(histogram.get(0).internal, 1);
}

#[test]
fn test_inserted_keys_resolve_at_internal_hop_count() {
    let items = random_items_with_seed([9; 32], 300);
    let trie = MemoryTrie::from_items(&items).unwrap();

    for item in &items {
        let depth = locate_depth(trie.root(), &item.key).unwrap();
        assert_eq!(depth, Some(internal_hops(trie.root(), &item.key)));
        assert_eq!(depth, locate_depth_indexed(trie.root(), &item.key).unwrap());
    }
}

#[test]
fn test_absent_keys_not_found() {
    let items = random_items_with_seed([1; 32], 200);
    let trie = MemoryTrie::from_items(&items).unwrap();

    for item in random_items_with_seed([2; 32], 50) {
        assert_eq!(locate_depth(trie.root(), &item.key).unwrap(), None);
        assert_eq!(locate_depth_indexed(trie.root(), &item.key).unwrap(), None);
    }
}

#[test]
fn test_classifier_is_idempotent() {
    let items = random_items_with_seed([4; 32], 200);
    let trie = MemoryTrie::from_items(&items).unwrap();

    let mut first = DepthHistogram::new();
    scan(trie.root(), &mut first, 0).unwrap();
    let second = DepthHistogram::from_root(trie.root()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_subtree_histograms_merge_to_whole() {
    let items = random_items_with_seed([5; 32], 200);
    let trie = MemoryTrie::from_items(&items).unwrap();
    let root = trie.root().as_internal().unwrap();

    let mut merged = DepthHistogram::new();
    for (_, child) in root.occupied() {
        let mut branch = DepthHistogram::new();
        scan(child, &mut branch, 1).unwrap();
        merged.merge(&branch);
    }
    let whole = DepthHistogram::from_root(trie.root()).unwrap();

    assert_eq!(merged.get(0).internal + 1, whole.get(0).internal);
    assert_eq!(merged.totals().leaves, whole.totals().leaves);
    assert_eq!(merged.totals().values, whole.totals().values);
}

// ============================================================================
// Proofs of absence
// ============================================================================

#[test]
fn test_absent_key_proof_carries_other_stem() {
    let items = prefixed_items(&["a711355f"]).unwrap();
    let trie = MemoryTrie::from_items(&items).unwrap();

    // Same first byte, lands on the a711 leaf
    let absent = key_from_prefix("a7ee").unwrap();
    let proof = trie.build_inclusion_proof(&[absent]).unwrap();
    let (serialized, diff) = trie.serialize_proof(&proof).unwrap();

    assert_eq!(serialized.other_stems, vec![items[0].key.stem()]);
    assert_eq!(diff[0].suffix_diffs[0].current_value, None);
    assert_eq!(estimate_proof_size(&serialized), 32 + 1 + 32 + 32 + 17 * 32);
}

// ============================================================================
// Opaque nodes
// ============================================================================

#[test]
fn test_pruned_trie_aborts_analysis() {
    let items = prefixed_items(&SIMPLE).unwrap();
    let mut trie = MemoryTrie::from_items(&items).unwrap();
    assert!(trie.prune(2) > 0);

    assert!(matches!(
        DepthHistogram::from_root(trie.root()),
        Err(Error::UnexpectedOpaqueNode { depth: 2, .. })
    ));
    assert!(matches!(
        locate_depth(trie.root(), &items[0].key),
        Err(Error::UnexpectedOpaqueNode { .. })
    ));
    assert!(matches!(
        trie.build_inclusion_proof(&[items[0].key]),
        Err(verkle_analysis::trie::ProofError::OpaqueOnPath { depth: 2 })
    ));
}

#[test]
fn test_bad_prefix_aborts_before_insert() {
    let err = prefixed_items(&["a711355f", "not-hex"]).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
