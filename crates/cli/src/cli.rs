use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strata_core::ChunkStrategy;

/// Hierarchical overlapping chunker for markdown documents.
///
/// Splits documents into document / section / paragraph / sentence fragments
/// (or flat word windows) ready for embedding.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Hierarchical overlapping chunker")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/strata/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log at info level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chunk one file ("-" for stdin) and print the analysis as JSON
    Analyze {
        path: String,
        #[command(flatten)]
        chunking: ChunkingArgs,
    },
    /// Chunk every .md/.txt file in a directory and write one JSON file each
    Process {
        dir: PathBuf,
        /// Output directory (default from config: processed_docs)
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        chunking: ChunkingArgs,
    },
    /// Chunk a file and print one fragment at the requested granularity
    Context {
        path: String,
        fragment_id: String,
        /// section, paragraph or sentence; anything else means sentence
        #[arg(long, default_value = "paragraph")]
        level: String,
        #[command(flatten)]
        chunking: ChunkingArgs,
    },
}

/// Per-run overrides; unset flags fall back to env, then config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ChunkingArgs {
    /// hierarchical, hierarchical_overlap or fixed_size
    #[arg(long)]
    pub strategy: Option<ChunkStrategy>,

    /// Neighbor sentences injected into paragraph fragments
    #[arg(long)]
    pub paragraph_overlap: Option<usize>,

    /// Neighbor characters injected into sentence fragments
    #[arg(long)]
    pub sentence_overlap: Option<usize>,

    /// Words per window for the fixed_size strategy
    #[arg(long)]
    pub fixed_size: Option<usize>,

    /// Only add sentence overlap when the neighbor is at least as long as the window
    #[arg(long)]
    pub strict_overlap: bool,

    /// Document id (default: file stem, or a random UUID for stdin)
    #[arg(long)]
    pub doc_id: Option<String>,
}
