//! Analysis configuration
//!
//! Read from a JSON file, by default ~/.config/verkle-analysis/config.json:
//!
//! ```json
//! { "sample_size": 1000, "shapes": { "simple": ["a711355f", "a77d337f"] } }
//! ```
//!
//! Shapes from the file are layered over the built-in ones.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default number of random keys per run
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Named lists of hex prefixes, plus the random sample size
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sample_size: usize,
    pub shapes: BTreeMap<String, Vec<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            sample_size: DEFAULT_SAMPLE_SIZE,
            shapes: builtin_shapes(),
        }
    }
}

impl AnalysisConfig {
    /// ~/.config/verkle-analysis/config.json, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("verkle-analysis").join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let mut config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        for (name, prefixes) in builtin_shapes() {
            config.shapes.entry(name).or_insert(prefixes);
        }
        debug!(path = %path.display(), shapes = config.shapes.len(), "loaded config");
        Ok(config)
    }

    /// Load `explicit` if given, else the default path if it exists, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn shape(&self, name: &str) -> Result<&[String]> {
        self.shapes
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownShape(name.to_string()))
    }
}

/// Shapes available without a config file
///
/// - `simple`: four keys under `a7`, two of them sharing `a77d`
/// - `deep`: stems sharing 13 bytes, forcing a long internal chain
/// - `dense`: sixteen siblings fanning out under `a7`
pub fn builtin_shapes() -> BTreeMap<String, Vec<String>> {
    let simple = ["a711355f", "a77d337f", "a7f9365f", "a77d397f"];
    let deep = vec![
        format!("{}01", "00".repeat(13)),
        format!("{}02", "00".repeat(13)),
        format!("{}0103", "00".repeat(12)),
        "80".to_string(),
    ];
    let dense: Vec<String> = (0..16u8).map(|i| format!("a7{:02x}", i)).collect();

    BTreeMap::from([
        (
            "simple".to_string(),
            simple.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        ),
        ("deep".to_string(), deep),
        ("dense".to_string(), dense),
    ])
}
