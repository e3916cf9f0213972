//! Processed-document JSON files, one per chunked document.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_core::{ChunkStrategy, Fragment, StrataError};
use tracing::debug;

use super::chunker::HierarchicalChunker;

/// A chunked document as persisted for a later embedding step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub doc_id: String,
    pub doc_name: String,
    pub strategy: ChunkStrategy,
    pub chunks: Vec<Fragment>,
}

impl ProcessedDocument {
    /// Snapshot the last run of `chunker`.
    pub fn from_chunker(chunker: &HierarchicalChunker, doc_name: impl Into<String>) -> Self {
        Self {
            doc_id: chunker.doc_id().to_string(),
            doc_name: doc_name.into(),
            strategy: chunker.config().strategy,
            chunks: chunker.fragments().to_vec(),
        }
    }

    /// `<out_dir>/<doc_id>.json`
    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(format!("{}.json", self.doc_id))
    }

    /// Write pretty JSON into `out_dir`, creating it if needed.
    pub fn write_to_dir(&self, out_dir: &Path) -> Result<PathBuf, StrataError> {
        fs::create_dir_all(out_dir)?;
        let path = self.output_path(out_dir);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), chunks = self.chunks.len(), "wrote processed document");
        Ok(path)
    }

    pub fn read_from_file(path: &Path) -> Result<Self, StrataError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ChunkingConfig;

    #[test]
    fn write_then_read_gives_equal_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut chunker = HierarchicalChunker::new("guide", "guide.md", ChunkingConfig::default());
        chunker.chunk_document("# Start\nOne. Two.\n\nThree. Four.");

        let doc = ProcessedDocument::from_chunker(&chunker, "guide.md");
        let path = doc.write_to_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("guide.json"));

        let loaded = ProcessedDocument::read_from_file(&path).unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(loaded.strategy, ChunkStrategy::HierarchicalOverlap);
    }

    #[test]
    fn json_uses_strategy_name() {
        let chunker = HierarchicalChunker::new("d", "", ChunkingConfig::default());
        let doc = ProcessedDocument::from_chunker(&chunker, "d.txt");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["strategy"], "hierarchical_overlap");
        assert_eq!(value["chunks"], serde_json::json!([]));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcessedDocument::read_from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StrataError::Io(_)));
    }
}
