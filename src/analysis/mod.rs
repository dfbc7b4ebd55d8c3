//! Structural analysis of Verkle tries
//!
//! Synthesizes keys, feeds them through a [`TrieEngine`](crate::trie::TrieEngine)
//! and measures the committed trie: per-depth node counts, key depths,
//! proof sizes and storage footprint.

mod histogram;
mod locate;
mod proof_size;
mod report;
mod run;
mod synth;

pub use histogram::{scan, DepthHistogram, DepthStats};
pub use locate::{locate_depth, locate_depth_indexed, locate_from};
pub use proof_size::estimate_proof_size;
pub use report::{render_json, render_table, render_text, AnalysisReport, KeyReport};
pub use run::analyze;
pub use synth::{
    constant_value, keccak256, key_from_prefix, prefixed_items, random_items,
    random_items_with_seed, KeySource, FILL_BYTE, VALUE_LABEL,
};
