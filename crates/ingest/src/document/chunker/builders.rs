//! Fragment builders: turn segmenter output into typed fragments.

use chrono::Utc;
use strata_core::{
    ChunkingConfig, DocumentMeta, FixedMeta, Fragment, FragmentId, FragmentLevel,
    FragmentMetadata, OverlapGuard, OverlapInfo, OverlapSource, ParagraphMeta, SectionMeta,
    SentenceMeta,
};

use super::helpers::{count_words, detect_sentences, head_chars, tail_chars};
use super::types::{ParagraphBlock, SectionBlock, SentenceBlock};

// ── Ids ─────────────────────────────────────────────────────────────────────

/// Per-level running counters scoped to one chunking run.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    doc_id: String,
    sections: usize,
    paragraphs: usize,
    sentences: usize,
    fixed: usize,
}

impl IdAllocator {
    pub(crate) fn new(doc_id: &str) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            sections: 0,
            paragraphs: 0,
            sentences: 0,
            fixed: 0,
        }
    }

    pub(crate) fn document_id(&self) -> FragmentId {
        format!("{}_{}", self.doc_id, FragmentLevel::Document.id_tag())
    }

    /// Next id at `level`: `<doc>_<tag>_<n>`, `n` counting from 0 per level.
    pub(crate) fn next(&mut self, level: FragmentLevel) -> FragmentId {
        let counter = match level {
            FragmentLevel::Document => return self.document_id(),
            FragmentLevel::Section => &mut self.sections,
            FragmentLevel::Paragraph => &mut self.paragraphs,
            FragmentLevel::Sentence => &mut self.sentences,
            FragmentLevel::Fixed => &mut self.fixed,
        };
        let n = *counter;
        *counter += 1;
        format!("{}_{}_{}", self.doc_id, level.id_tag(), n)
    }
}

// ── Document / section ──────────────────────────────────────────────────────

pub(crate) fn build_document(id: FragmentId, text: &str, title: &str) -> Fragment {
    Fragment::new(
        id,
        text,
        None,
        FragmentMetadata::Document(DocumentMeta {
            title: title.to_string(),
            word_count: count_words(text),
            created_at: Utc::now(),
            retrievable: None,
        }),
    )
}

/// Sections are structural context and never retrievable.
pub(crate) fn build_section(
    section: &SectionBlock,
    parent_id: &str,
    ids: &mut IdAllocator,
) -> Fragment {
    let markers = "#".repeat(usize::from(section.level));
    Fragment::new(
        ids.next(FragmentLevel::Section),
        format!("{markers} {}\n\n{}", section.title, section.content),
        Some(parent_id.to_string()),
        FragmentMetadata::Section(SectionMeta {
            title: section.title.clone(),
            header_level: section.level,
            word_count: count_words(&section.content),
            retrievable: false,
        }),
    )
}

// ── Paragraphs ──────────────────────────────────────────────────────────────

pub(crate) fn build_plain_paragraphs(
    paragraphs: &[ParagraphBlock],
    parent_id: &str,
    ids: &mut IdAllocator,
) -> Vec<Fragment> {
    paragraphs
        .iter()
        .map(|para| {
            Fragment::new(
                ids.next(FragmentLevel::Paragraph),
                para.content.clone(),
                Some(parent_id.to_string()),
                FragmentMetadata::Paragraph(ParagraphMeta {
                    core_content: para.content.clone(),
                    paragraph_index: para.index,
                    word_count: para.word_count,
                    has_context: false,
                    retrievable: true,
                    overlap_info: None,
                }),
            )
        })
        .collect()
}

fn join_sentences(sentences: &[SentenceBlock]) -> String {
    sentences
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paragraph fragments carrying the last/first `paragraph_overlap_sentences`
/// sentences of their siblings. A neighbor with fewer sentences than that
/// contributes nothing.
pub(crate) fn build_overlapping_paragraphs(
    paragraphs: &[ParagraphBlock],
    parent_id: &str,
    section_title: &str,
    config: &ChunkingConfig,
    ids: &mut IdAllocator,
) -> Vec<Fragment> {
    let n = config.paragraph_overlap_sentences;
    let sentence_lists: Vec<Vec<SentenceBlock>> = paragraphs
        .iter()
        .map(|p| detect_sentences(&p.content))
        .collect();

    let mut fragments = Vec::with_capacity(paragraphs.len());
    for (i, para) in paragraphs.iter().enumerate() {
        let mut body = para.content.clone();
        let mut overlap_info = OverlapInfo::default();

        if n > 0 && i > 0 {
            let prev = &sentence_lists[i - 1];
            if prev.len() >= n {
                let overlap = join_sentences(&prev[prev.len() - n..]);
                body = format!("[Previous context: {overlap}] {body}");
                overlap_info.record(OverlapSource::PreviousParagraph { sentences: n });
            }
        }

        if n > 0 && i + 1 < paragraphs.len() {
            let next = &sentence_lists[i + 1];
            if next.len() >= n {
                let overlap = join_sentences(&next[..n]);
                body = format!("{body} [Following context: {overlap}]");
                overlap_info.record(OverlapSource::NextParagraph { sentences: n });
            }
        }

        fragments.push(Fragment::new(
            ids.next(FragmentLevel::Paragraph),
            format!("Section: {section_title}\n\n{body}"),
            Some(parent_id.to_string()),
            FragmentMetadata::Paragraph(ParagraphMeta {
                core_content: para.content.clone(),
                paragraph_index: para.index,
                word_count: para.word_count,
                has_context: true,
                retrievable: true,
                overlap_info: Some(overlap_info),
            }),
        ));
    }
    fragments
}

// ── Sentences ───────────────────────────────────────────────────────────────

pub(crate) fn build_plain_sentences(
    sentences: &[SentenceBlock],
    parent_id: &str,
    ids: &mut IdAllocator,
) -> Vec<Fragment> {
    sentences
        .iter()
        .map(|sent| {
            Fragment::new(
                ids.next(FragmentLevel::Sentence),
                sent.content.clone(),
                Some(parent_id.to_string()),
                FragmentMetadata::Sentence(SentenceMeta {
                    core_content: sent.content.clone(),
                    sentence_index: sent.index,
                    char_count: sent.char_count,
                    has_context: false,
                    retrievable: true,
                    overlap_info: None,
                }),
            )
        })
        .collect()
}

/// Ancestor text a sentence fragment is framed with.
pub(crate) struct SentenceContext<'a> {
    pub section_title: &'a str,
    /// Core content of the parent paragraph.
    pub paragraph: &'a str,
}

fn neighbor_qualifies(neighbor: &SentenceBlock, window: usize, guard: OverlapGuard) -> bool {
    match guard {
        OverlapGuard::Clamp => true,
        OverlapGuard::RequireFull => neighbor.char_count >= window,
    }
}

/// Sentence fragments carrying up to `sentence_overlap_chars` characters of
/// their siblings, framed by section title and parent paragraph.
pub(crate) fn build_overlapping_sentences(
    sentences: &[SentenceBlock],
    parent_id: &str,
    context: &SentenceContext<'_>,
    config: &ChunkingConfig,
    ids: &mut IdAllocator,
) -> Vec<Fragment> {
    let m = config.sentence_overlap_chars;
    let guard = config.overlap_guard;

    let mut fragments = Vec::with_capacity(sentences.len());
    for (i, sent) in sentences.iter().enumerate() {
        let mut body = sent.content.clone();
        let mut overlap_info = OverlapInfo::default();

        if m > 0 && i > 0 {
            let prev = &sentences[i - 1];
            if neighbor_qualifies(prev, m, guard) {
                body = format!("...{} {body}", tail_chars(&prev.content, m));
                overlap_info.record(OverlapSource::PreviousSentence { chars: m });
            }
        }

        if m > 0 && i + 1 < sentences.len() {
            let next = &sentences[i + 1];
            if neighbor_qualifies(next, m, guard) {
                body = format!("{body} {}...", head_chars(&next.content, m));
                overlap_info.record(OverlapSource::NextSentence { chars: m });
            }
        }

        fragments.push(Fragment::new(
            ids.next(FragmentLevel::Sentence),
            format!(
                "Section: {}\n\nParagraph context: {}\n\nSpecific info: {body}",
                context.section_title, context.paragraph
            ),
            Some(parent_id.to_string()),
            FragmentMetadata::Sentence(SentenceMeta {
                core_content: sent.content.clone(),
                sentence_index: sent.index,
                char_count: sent.char_count,
                has_context: true,
                retrievable: true,
                overlap_info: Some(overlap_info),
            }),
        ));
    }
    fragments
}

// ── Fixed-size windows ──────────────────────────────────────────────────────

/// Consecutive `window`-word slices of `text`; the last may be shorter.
/// `window` must be non-zero.
pub(crate) fn build_fixed_windows(text: &str, window: usize, ids: &mut IdAllocator) -> Vec<Fragment> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(window)
        .enumerate()
        .map(|(n, slice)| {
            let start = n * window;
            Fragment::new(
                ids.next(FragmentLevel::Fixed),
                slice.join(" "),
                None,
                FragmentMetadata::Fixed(FixedMeta {
                    start_index: start,
                    end_index: start + slice.len(),
                    word_count: slice.len(),
                    retrievable: true,
                }),
            )
        })
        .collect()
}
