//! Aggregate statistics over a chunking run.

use indexmap::IndexMap;
use serde::Serialize;
use strata_core::{Fragment, FragmentLevel, FragmentMetadata};

use super::helpers::head_chars;
use super::strategies::HierarchicalChunker;

const SAMPLE_LIMIT: usize = 5;
const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize)]
pub struct SampleChunk {
    pub id: String,
    pub level: FragmentLevel,
    /// First 200 characters, with "..." appended when cut.
    pub content_preview: String,
    pub metadata: FragmentMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkingAnalysis {
    pub total_chunks: usize,
    pub total_retrievable_chunks: usize,
    /// Characters of `content` summed over retrievable fragments.
    pub total_characters_retrievable: usize,
    pub avg_chunk_length_retrievable: f64,
    pub sample_retrievable_chunks: Vec<SampleChunk>,
    /// Fragment count per level, in first-seen order.
    pub chunk_counts_by_level: IndexMap<FragmentLevel, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlapStats {
    pub total_chunks: usize,
    pub chunks_with_overlap: usize,
    pub paragraph_overlaps: usize,
    pub sentence_overlaps: usize,
    /// Overlap-source tag → number of fragments carrying it.
    pub overlap_types: IndexMap<String, usize>,
}

fn preview(content: &str) -> String {
    let head = head_chars(content, PREVIEW_CHARS);
    if head.len() < content.len() {
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Summarize `fragments` for observability. Retrievability follows each
/// fragment's metadata; a document without an explicit flag counts.
pub fn get_chunking_analysis(fragments: &[Fragment]) -> ChunkingAnalysis {
    let retrievable: Vec<&Fragment> = fragments.iter().filter(|f| f.is_retrievable()).collect();

    let total_characters: usize = retrievable.iter().map(|f| f.content.chars().count()).sum();
    let avg = if retrievable.is_empty() {
        0.0
    } else {
        total_characters as f64 / retrievable.len() as f64
    };

    let samples = retrievable
        .iter()
        .take(SAMPLE_LIMIT)
        .map(|f| SampleChunk {
            id: f.id.clone(),
            level: f.level(),
            content_preview: preview(&f.content),
            metadata: f.metadata.clone(),
        })
        .collect();

    let mut level_counts: IndexMap<FragmentLevel, usize> = IndexMap::new();
    for fragment in fragments {
        *level_counts.entry(fragment.level()).or_insert(0) += 1;
    }

    ChunkingAnalysis {
        total_chunks: fragments.len(),
        total_retrievable_chunks: retrievable.len(),
        total_characters_retrievable: total_characters,
        avg_chunk_length_retrievable: avg,
        sample_retrievable_chunks: samples,
        chunk_counts_by_level: level_counts,
    }
}

/// Tally fragments that received neighbor overlap.
pub fn overlap_stats(fragments: &[Fragment]) -> OverlapStats {
    let mut stats = OverlapStats {
        total_chunks: fragments.len(),
        ..Default::default()
    };

    for fragment in fragments {
        let Some(info) = fragment.metadata.overlap_info() else {
            continue;
        };
        if !info.has_overlap {
            continue;
        }
        stats.chunks_with_overlap += 1;
        match fragment.level() {
            FragmentLevel::Paragraph => stats.paragraph_overlaps += 1,
            FragmentLevel::Sentence => stats.sentence_overlaps += 1,
            _ => {}
        }
        for source in &info.overlap_source {
            *stats.overlap_types.entry(source.to_string()).or_insert(0) += 1;
        }
    }
    stats
}

impl HierarchicalChunker {
    pub fn get_chunking_analysis(&self) -> ChunkingAnalysis {
        get_chunking_analysis(self.fragments())
    }

    /// Overlap statistics for the last run; all zeros unless the overlap
    /// strategy was used.
    pub fn get_overlapping_stats(&self) -> OverlapStats {
        overlap_stats(self.fragments())
    }
}
