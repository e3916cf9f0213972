//! Subcommand bodies. Each writes its report to the given writer.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use strata_core::ChunkingConfig;
use strata_ingest::document::{extract_file, is_supported};
use strata_ingest::{extract_text, ContextLevel, ExtractedDocument, HierarchicalChunker, ProcessedDocument};
use tracing::{info, warn};

/// Name given to text read from stdin; decides markdown extraction.
const STDIN_FILENAME: &str = "stdin.md";

/// A document ready to chunk.
struct Input {
    doc_id: String,
    title: String,
    text: String,
}

fn read_input(path: &str, doc_id: Option<&str>) -> Result<Input> {
    if path != "-" {
        let doc = extract_file(Path::new(path)).with_context(|| format!("failed to extract {path}"))?;
        return Ok(input_from(doc, doc_id));
    }

    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("failed to read stdin")?;
    let doc = extract_text(&bytes, STDIN_FILENAME)?;
    Ok(Input {
        doc_id: doc_id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        title: String::new(),
        text: doc.text,
    })
}

fn input_from(doc: ExtractedDocument, doc_id: Option<&str>) -> Input {
    Input {
        doc_id: doc_id.map(str::to_string).unwrap_or_else(|| doc.doc_id()),
        title: doc.title(),
        text: doc.text,
    }
}

fn chunk(input: &Input, config: ChunkingConfig) -> HierarchicalChunker {
    let mut chunker = HierarchicalChunker::new(&input.doc_id, &input.title, config);
    chunker.chunk_document(&input.text);
    chunker
}

/// `strata analyze`
pub fn analyze(
    path: &str,
    doc_id: Option<&str>,
    config: ChunkingConfig,
    out: &mut impl Write,
) -> Result<()> {
    let input = read_input(path, doc_id)?;
    let chunker = chunk(&input, config);
    write_analysis(&chunker, out)
}

fn write_analysis(chunker: &HierarchicalChunker, out: &mut impl Write) -> Result<()> {
    let mut report = serde_json::json!({
        "doc_id": chunker.doc_id(),
        "strategy": chunker.config().strategy,
        "analysis": chunker.get_chunking_analysis(),
    });
    if chunker.config().strategy.uses_overlap() {
        report["overlap_stats"] = serde_json::to_value(chunker.get_overlapping_stats())?;
    }
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// `strata process`: returns the paths written.
pub fn process(dir: &Path, out_dir: &Path, config: &ChunkingConfig) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_supported(&p.to_string_lossy()))
        .collect();
    entries.sort();

    let mut written = Vec::with_capacity(entries.len());
    for path in &entries {
        let doc = match extract_file(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable document");
                continue;
            }
        };
        let doc_name = doc.title();
        let chunker = chunk(&input_from(doc, None), config.clone());
        let processed = ProcessedDocument::from_chunker(&chunker, doc_name);
        let target = processed
            .write_to_dir(out_dir)
            .with_context(|| format!("failed to write {}", processed.doc_id))?;
        info!(path = %target.display(), chunks = processed.chunks.len(), "processed document");
        written.push(target);
    }
    Ok(written)
}

/// `strata context`
pub fn context(
    path: &str,
    fragment_id: &str,
    level: ContextLevel,
    doc_id: Option<&str>,
    config: ChunkingConfig,
    out: &mut impl Write,
) -> Result<()> {
    let input = read_input(path, doc_id)?;
    let chunker = chunk(&input, config);
    if chunker.get(fragment_id).is_none() {
        warn!(fragment_id, "no fragment with this id");
    }
    writeln!(out, "{}", chunker.get_chunk_with_context(fragment_id, level))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ChunkStrategy;

    const GUIDE: &str = "# Setup\nInstall it. Run it.\n\nThen configure. Then relax.";

    fn write_docs(dir: &Path) {
        std::fs::write(dir.join("guide.md"), GUIDE).unwrap();
        std::fs::write(dir.join("notes.txt"), "Plain notes. Nothing more.").unwrap();
        std::fs::write(dir.join("image.png"), [0u8, 1, 2]).unwrap();
    }

    #[test]
    fn test_analyze_reports_overlap_stats() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(dir.path());
        let path = dir.path().join("guide.md");

        let mut out = Vec::new();
        analyze(path.to_str().unwrap(), None, ChunkingConfig::default(), &mut out).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["doc_id"], "guide");
        assert_eq!(report["analysis"]["total_chunks"], 8);
        assert!(report["overlap_stats"].is_object());
    }

    #[test]
    fn test_analyze_plain_strategy_omits_overlap_stats() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(dir.path());
        let path = dir.path().join("guide.md");
        let config = ChunkingConfig {
            strategy: ChunkStrategy::Hierarchical,
            ..Default::default()
        };

        let mut out = Vec::new();
        analyze(path.to_str().unwrap(), Some("custom"), config, &mut out).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["doc_id"], "custom");
        assert!(report.get("overlap_stats").is_none());
    }

    #[test]
    fn test_process_writes_one_file_per_supported_document() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(dir.path());
        let out_dir = dir.path().join("processed_docs");

        let written = process(dir.path(), &out_dir, &ChunkingConfig::default()).unwrap();
        assert_eq!(written, vec![out_dir.join("guide.json"), out_dir.join("notes.json")]);

        let notes = ProcessedDocument::read_from_file(&out_dir.join("notes.json")).unwrap();
        assert_eq!(notes.doc_name, "notes.txt");
        assert!(!notes.chunks.is_empty());
    }

    #[test]
    fn test_process_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(process(&missing, dir.path(), &ChunkingConfig::default()).is_err());
    }

    #[test]
    fn test_context_prints_section_text() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(dir.path());
        let path = dir.path().join("guide.md");

        let mut out = Vec::new();
        context(
            path.to_str().unwrap(),
            "guide_sent_0",
            ContextLevel::Section,
            None,
            ChunkingConfig::default(),
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# Setup\n\nInstall it."));
    }

    #[test]
    fn test_context_unknown_id_prints_empty_line() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(dir.path());
        let path = dir.path().join("guide.md");

        let mut out = Vec::new();
        context(
            path.to_str().unwrap(),
            "guide_sent_99",
            ContextLevel::Paragraph,
            None,
            ChunkingConfig::default(),
            &mut out,
        )
        .unwrap();
        assert_eq!(out, b"\n");
    }
}
