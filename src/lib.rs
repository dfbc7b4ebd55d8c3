//! # verkle_analysis
//!
//! Structural statistics for Verkle tries.
//!
//! Builds a trie from synthetic or random keys through a trie engine and
//! reports how it is shaped: how many internal nodes, leaves and values
//! sit at each depth, where each key resolves, how large a single-key
//! proof is, and how many bytes the committed trie takes to store.
//!
//! ## Core Concepts
//!
//! - **Keys**: 32 bytes, a 31-byte stem plus a 1-byte suffix
//! - **Leaves**: one per stem, holding up to 256 values
//! - **Internal nodes**: 256-way branches on successive stem bytes
//! - **Opaque nodes**: subtrees known only by their commitment
//!
//! ## Example
//!
//! ```ignore
//! use verkle_analysis::{analysis, MemoryTrie};
//!
//! let items = analysis::prefixed_items(&["a711355f", "a77d337f"])?;
//! let report = analysis::analyze(&mut MemoryTrie::new(), &items)?;
//! println!("{}", analysis::render_text(&report));
//! ```

pub mod analysis;
pub mod config;
pub mod model;
pub mod trie;

mod error;

pub use analysis::{AnalysisReport, DepthHistogram, DepthStats, KeySource};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use model::{Commitment, Key, KeyValue, Stem, Value};
pub use trie::{MemoryTrie, TrieEngine, VerkleNode, VerkleProof};
