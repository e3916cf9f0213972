use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StrataError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match env_opt(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparsable env value, using default");
            default
        }),
        None => default,
    }
}

// ── Strategy ──────────────────────────────────────────────────

/// Fragment-construction policy for one chunking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Document → section → paragraph → sentence, raw text only.
    Hierarchical,
    /// Same tree, with ancestor titles and neighbor overlap injected.
    #[default]
    HierarchicalOverlap,
    /// Flat word windows, no tree.
    FixedSize,
}

impl ChunkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkStrategy::Hierarchical => "hierarchical",
            ChunkStrategy::HierarchicalOverlap => "hierarchical_overlap",
            ChunkStrategy::FixedSize => "fixed_size",
        }
    }

    pub fn uses_overlap(&self) -> bool {
        matches!(self, ChunkStrategy::HierarchicalOverlap)
    }
}

impl fmt::Display for ChunkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkStrategy {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "hierarchical" => Ok(ChunkStrategy::Hierarchical),
            "hierarchical_overlap" => Ok(ChunkStrategy::HierarchicalOverlap),
            "fixed_size" | "fixed" => Ok(ChunkStrategy::FixedSize),
            _ => Err(StrataError::InvalidStrategy(s.to_string())),
        }
    }
}

// ── Overlap guard ─────────────────────────────────────────────

/// How sentence-level character overlap treats neighbors shorter than the
/// configured window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapGuard {
    /// Take `min(window, neighbor length)` characters.
    #[default]
    Clamp,
    /// Skip the neighbor entirely unless it holds at least `window` characters.
    RequireFull,
}

impl OverlapGuard {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapGuard::Clamp => "clamp",
            OverlapGuard::RequireFull => "require_full",
        }
    }
}

impl fmt::Display for OverlapGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlapGuard {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "clamp" => Ok(OverlapGuard::Clamp),
            "require_full" | "strict" => Ok(OverlapGuard::RequireFull),
            _ => Err(StrataError::InvalidOverlapGuard(s.to_string())),
        }
    }
}

// ── Chunking config ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default)]
    pub strategy: ChunkStrategy,
    /// Neighbor sentences injected into paragraph fragments (default: 2).
    #[serde(default = "default_paragraph_overlap")]
    pub paragraph_overlap_sentences: usize,
    /// Neighbor characters injected into sentence fragments (default: 100).
    #[serde(default = "default_sentence_overlap")]
    pub sentence_overlap_chars: usize,
    /// Words per window for the fixed-size strategy (default: 200).
    #[serde(default = "default_fixed_chunk_size")]
    pub fixed_chunk_size: usize,
    #[serde(default)]
    pub overlap_guard: OverlapGuard,
}

fn default_paragraph_overlap() -> usize {
    2
}

fn default_sentence_overlap() -> usize {
    100
}

fn default_fixed_chunk_size() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkStrategy::default(),
            paragraph_overlap_sentences: default_paragraph_overlap(),
            sentence_overlap_chars: default_sentence_overlap(),
            fixed_chunk_size: default_fixed_chunk_size(),
            overlap_guard: OverlapGuard::default(),
        }
    }
}

impl ChunkingConfig {
    /// Build config from `STRATA_*` environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay any `STRATA_*` variables present in the environment onto `self`.
    pub fn with_env_overrides(self) -> Self {
        Self {
            strategy: env_parse("STRATA_STRATEGY", self.strategy),
            paragraph_overlap_sentences: env_parse(
                "STRATA_PARAGRAPH_OVERLAP_SENTENCES",
                self.paragraph_overlap_sentences,
            ),
            sentence_overlap_chars: env_parse(
                "STRATA_SENTENCE_OVERLAP_CHARS",
                self.sentence_overlap_chars,
            ),
            fixed_chunk_size: env_parse("STRATA_FIXED_CHUNK_SIZE", self.fixed_chunk_size),
            overlap_guard: env_parse("STRATA_OVERLAP_GUARD", self.overlap_guard),
        }
    }

    /// Window size actually used by the fixed-size strategy; never zero.
    pub fn effective_fixed_chunk_size(&self) -> usize {
        if self.fixed_chunk_size == 0 {
            tracing::warn!("fixed_chunk_size is 0, clamping to 1");
            1
        } else {
            self.fixed_chunk_size
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("Chunking config:");
        tracing::info!("  strategy:          {}", self.strategy);
        tracing::info!("  paragraph overlap: {} sentences", self.paragraph_overlap_sentences);
        tracing::info!("  sentence overlap:  {} chars ({})", self.sentence_overlap_chars, self.overlap_guard);
        tracing::info!("  fixed window:      {} words", self.fixed_chunk_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ChunkingConfig::default();
        assert_eq!(config.strategy, ChunkStrategy::HierarchicalOverlap);
        assert_eq!(config.paragraph_overlap_sentences, 2);
        assert_eq!(config.sentence_overlap_chars, 100);
        assert_eq!(config.fixed_chunk_size, 200);
        assert_eq!(config.overlap_guard, OverlapGuard::Clamp);
    }

    #[test]
    fn strategy_parses_names_and_alias() {
        assert_eq!("hierarchical".parse::<ChunkStrategy>().unwrap(), ChunkStrategy::Hierarchical);
        assert_eq!(
            "hierarchical-overlap".parse::<ChunkStrategy>().unwrap(),
            ChunkStrategy::HierarchicalOverlap
        );
        assert_eq!("fixed".parse::<ChunkStrategy>().unwrap(), ChunkStrategy::FixedSize);
        assert!(matches!(
            "semantic".parse::<ChunkStrategy>(),
            Err(StrataError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn strategy_display_roundtrips() {
        for s in [
            ChunkStrategy::Hierarchical,
            ChunkStrategy::HierarchicalOverlap,
            ChunkStrategy::FixedSize,
        ] {
            assert_eq!(s.to_string().parse::<ChunkStrategy>().unwrap(), s);
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ChunkingConfig =
            serde_json::from_str(r#"{"strategy": "fixed_size", "fixed_chunk_size": 50}"#).unwrap();
        assert_eq!(config.strategy, ChunkStrategy::FixedSize);
        assert_eq!(config.fixed_chunk_size, 50);
        assert_eq!(config.paragraph_overlap_sentences, 2);
        assert_eq!(config.sentence_overlap_chars, 100);
    }

    #[test]
    fn zero_window_is_clamped() {
        let config = ChunkingConfig {
            fixed_chunk_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_fixed_chunk_size(), 1);
    }

    #[test]
    fn overlap_guard_parses() {
        assert_eq!("strict".parse::<OverlapGuard>().unwrap(), OverlapGuard::RequireFull);
        assert_eq!("clamp".parse::<OverlapGuard>().unwrap(), OverlapGuard::Clamp);
        assert!("loose".parse::<OverlapGuard>().is_err());
    }

    #[test]
    fn env_overlay_applies_and_skips_unparsable_values() {
        // Only test in this crate touching STRATA_* vars.
        let keys = ["STRATA_PARAGRAPH_OVERLAP_SENTENCES", "STRATA_OVERLAP_GUARD"];
        let saved: Vec<Option<String>> = keys.iter().map(|k| env::var(k).ok()).collect();
        env::set_var(keys[0], "5");
        env::set_var(keys[1], "sometimes");

        let base = ChunkingConfig {
            overlap_guard: OverlapGuard::RequireFull,
            ..Default::default()
        };
        let config = base.with_env_overrides();

        for (key, value) in keys.iter().zip(saved) {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        assert_eq!(config.paragraph_overlap_sentences, 5);
        assert_eq!(config.overlap_guard, OverlapGuard::RequireFull);
        assert_eq!(config.sentence_overlap_chars, 100);
    }
}
