//! Core data model types for verkle_analysis

mod commitment;
mod key;

pub use commitment::Commitment;
pub use key::{Key, KeyValue, Stem, Value, KEY_SIZE, NODE_WIDTH, STEM_SIZE};
