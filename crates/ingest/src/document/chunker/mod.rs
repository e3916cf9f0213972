//! Hierarchical overlapping chunker.
//!
//! Decomposes markdown-like text into a document → section → paragraph →
//! sentence tree, injecting bounded neighbor context into paragraph and
//! sentence fragments, or into flat fixed-size word windows.

mod analysis;
mod builders;
mod context;
mod helpers;
mod strategies;
mod types;

pub use analysis::{get_chunking_analysis, overlap_stats, ChunkingAnalysis, OverlapStats, SampleChunk};
pub use context::ContextLevel;
pub use helpers::{detect_paragraphs, detect_sections, detect_sentences, parse_header};
pub use strategies::HierarchicalChunker;
pub use types::{ParagraphBlock, SectionBlock, SentenceBlock};
