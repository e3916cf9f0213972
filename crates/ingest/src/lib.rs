//! Document extraction and hierarchical overlapping chunking.

pub mod document;

pub use document::chunker::{
    get_chunking_analysis, ChunkingAnalysis, ContextLevel, HierarchicalChunker, OverlapStats,
};
pub use document::export::ProcessedDocument;
pub use document::{extract_text, ExtractedDocument, ExtractionError};
