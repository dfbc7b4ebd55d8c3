//! verkle-analysis CLI
//!
//! Builds a Verkle trie from synthetic keys and prints its per-depth
//! structure, key depths, proof sizes and storage footprint.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{prelude::*, EnvFilter};
use verkle_analysis::analysis::{self, KeySource};
use verkle_analysis::{AnalysisConfig, MemoryTrie};

#[derive(Parser)]
#[command(name = "verkle-analysis")]
#[command(about = "Structural statistics and proof sizes for Verkle tries")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file (default: ~/.config/verkle-analysis/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Log each key and phase to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the built-in four-key shape
    Simple,

    /// Analyze a named shape from the config
    Shape {
        /// Shape name
        name: String,
    },

    /// Analyze keys built from hex prefixes padded with 0xff
    Prefixes {
        /// Hex prefixes, one key each
        #[arg(required = true)]
        prefixes: Vec<String>,
    },

    /// Analyze hashed random keys
    Random {
        /// Number of keys (default: sample_size from the config)
        #[arg(short, long)]
        size: Option<usize>,
        /// 32-byte hex seed for a reproducible run
        #[arg(long)]
        seed: Option<String>,
    },

    /// List configured shapes
    Shapes,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AnalysisConfig::load_or_default(cli.config.as_deref())?;

    let source = match cli.command {
        Commands::Simple => KeySource::Prefixes(config.shape("simple")?.to_vec()),
        Commands::Shape { name } => KeySource::Prefixes(config.shape(&name)?.to_vec()),
        Commands::Prefixes { prefixes } => KeySource::Prefixes(prefixes),
        Commands::Random { size, seed } => KeySource::Random {
            count: size.unwrap_or(config.sample_size),
            seed: seed.as_deref().map(parse_seed).transpose()?,
        },
        Commands::Shapes => {
            output(
                &cli.format,
                &serde_json::json!({
                    "sample_size": config.sample_size,
                    "shapes": config.shapes
                }),
            );
            return Ok(());
        }
    };

    let items = source.synthesize()?;
    if let KeySource::Random { count, .. } = source {
        eprintln!("generated {} kv", count);
    }

    let report = analysis::analyze(&mut MemoryTrie::new(), &items)?;
    match cli.format {
        OutputFormat::Json => output(&cli.format, &analysis::render_json(&report)),
        OutputFormat::Text => println!("{}", analysis::render_text(&report)),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    // Take RUST_LOG over the flag
    let filter = if std::env::var(EnvFilter::DEFAULT_ENV)
        .unwrap_or_default()
        .is_empty()
    {
        EnvFilter::new(if verbose { "verkle_analysis=debug" } else { "warn" })
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_seed(hex_seed: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = hex::decode(hex_seed.strip_prefix("0x").unwrap_or(hex_seed))
        .with_context(|| format!("Invalid seed: {}", hex_seed))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("Seed must be 32 bytes, got {}", b.len()))
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value).unwrap());
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value).unwrap());
        }
    }
}
