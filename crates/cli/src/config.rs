use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strata_core::{ChunkingConfig, OverlapGuard};
use tracing::debug;

use crate::cli::ChunkingArgs;

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where `process` writes processed documents
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Chunking defaults (`[chunking]` table)
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("processed_docs")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            chunking: ChunkingConfig::default(),
        }
    }
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/strata/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("strata");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => match Self::default_config_path() {
                Ok(p) => p,
                Err(e) => {
                    debug!(error = %e, "No config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Effective chunking config.
    /// Priority: cli flags > STRATA_* env vars > config file > defaults.
    pub fn resolve_chunking(&self, args: &ChunkingArgs) -> ChunkingConfig {
        let base = self.chunking.clone().with_env_overrides();
        ChunkingConfig {
            strategy: args.strategy.unwrap_or(base.strategy),
            paragraph_overlap_sentences: args
                .paragraph_overlap
                .unwrap_or(base.paragraph_overlap_sentences),
            sentence_overlap_chars: args.sentence_overlap.unwrap_or(base.sentence_overlap_chars),
            fixed_chunk_size: args.fixed_size.unwrap_or(base.fixed_chunk_size),
            overlap_guard: if args.strict_overlap {
                OverlapGuard::RequireFull
            } else {
                base.overlap_guard
            },
        }
    }

    /// Output directory for `process`.
    /// Priority: cli_override > config file.
    pub fn resolve_output_dir(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override.unwrap_or_else(|| self.output_dir.clone())
    }
}
