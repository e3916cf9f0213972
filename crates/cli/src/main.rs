mod cli;
mod commands;
mod config;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use strata_ingest::ContextLevel;

use crate::cli::{CliArgs, Command};
use crate::config::CliConfig;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize tracing
    let default_filter = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    strata_core::config::load_dotenv();

    let config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Analyze { path, chunking } => {
            let resolved = config.resolve_chunking(&chunking);
            resolved.log_summary();
            commands::analyze(&path, chunking.doc_id.as_deref(), resolved, &mut out)?;
        }
        Command::Process { dir, out: out_dir, chunking } => {
            let resolved = config.resolve_chunking(&chunking);
            resolved.log_summary();
            if chunking.doc_id.is_some() {
                warn!("--doc-id is ignored by process; ids come from file names");
            }
            let out_dir = config.resolve_output_dir(out_dir);
            let written = commands::process(&dir, &out_dir, &resolved)?;
            info!(count = written.len(), out_dir = %out_dir.display(), "process complete");
            for path in written {
                writeln!(out, "{}", path.display())?;
            }
        }
        Command::Context {
            path,
            fragment_id,
            level,
            chunking,
        } => {
            let resolved = config.resolve_chunking(&chunking);
            commands::context(
                &path,
                &fragment_id,
                ContextLevel::from(level.as_str()),
                chunking.doc_id.as_deref(),
                resolved,
                &mut out,
            )?;
        }
    }

    Ok(())
}
