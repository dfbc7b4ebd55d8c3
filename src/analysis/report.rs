//! Report rendering

use super::histogram::DepthHistogram;
use crate::model::{Commitment, Key};
use comfy_table::{presets, Cell, Row, Table};
use std::fmt::Write;

/// Per-key result of an analysis run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyReport {
    pub key: Key,
    /// Depth of the leaf holding the key, `None` if not found
    pub depth: Option<usize>,
    /// [`estimate_proof_size`](super::estimate_proof_size) of the key's proof
    pub proof_size: usize,
    /// Bincode length of the same proof
    pub encoded_size: usize,
}

/// Everything an analysis run produces
#[derive(Clone, Debug)]
pub struct AnalysisReport {
    pub root: Commitment,
    pub keys: Vec<KeyReport>,
    pub histogram: DepthHistogram,
    /// Serialized nodes in the trie
    pub node_count: usize,
    /// Commitment plus encoding bytes summed over all nodes
    pub storage_bytes: usize,
}

/// One row per depth: Level, InternalNode, LeafNode, Value
pub fn render_table(histogram: &DepthHistogram) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::ASCII_MARKDOWN);
    table.set_header(["Level", "InternalNode", "LeafNode", "Value"]);

    for (depth, stats) in histogram.rows() {
        let mut row = Row::new();
        row.add_cell(Cell::new(depth))
            .add_cell(Cell::new(stats.internal))
            .add_cell(Cell::new(stats.leaves))
            .add_cell(Cell::new(stats.values));
        table.add_row(row);
    }
    table
}

/// Level as printed: the depth, or -1 when the key was not found
fn level(depth: Option<usize>) -> String {
    depth.map_or_else(|| "-1".to_string(), |d| d.to_string())
}

pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    for entry in &report.keys {
        let _ = writeln!(
            out,
            "key: {} level: {} proof: {}",
            entry.key,
            level(entry.depth),
            entry.proof_size
        );
    }
    let _ = writeln!(out, "{}", render_table(&report.histogram));
    let _ = writeln!(
        out,
        "total storage: {} bytes in {} nodes",
        report.storage_bytes, report.node_count
    );
    let _ = write!(out, "root: {}", report.root);
    out
}

pub fn render_json(report: &AnalysisReport) -> serde_json::Value {
    let keys: Vec<_> = report
        .keys
        .iter()
        .map(|entry| {
            serde_json::json!({
                "key": entry.key.to_hex(),
                "level": entry.depth,
                "proof_size": entry.proof_size,
                "encoded_size": entry.encoded_size
            })
        })
        .collect();
    let levels: Vec<_> = report
        .histogram
        .rows()
        .into_iter()
        .map(|(depth, stats)| {
            serde_json::json!({
                "level": depth,
                "internal": stats.internal,
                "leaves": stats.leaves,
                "values": stats.values
            })
        })
        .collect();

    serde_json::json!({
        "root": report.root.to_hex(),
        "keys": keys,
        "levels": levels,
        "totals": report.histogram.totals(),
        "storage": {
            "nodes": report.node_count,
            "bytes": report.storage_bytes
        }
    })
}
