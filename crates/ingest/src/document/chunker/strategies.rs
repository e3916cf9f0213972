//! Hierarchy assembler: runs segmenters and builders top-down per strategy.

use std::collections::HashMap;

use strata_core::{ChunkStrategy, ChunkingConfig, Fragment, FragmentId, FragmentLevel};
use tracing::{debug, warn};

use super::builders::{
    build_document, build_fixed_windows, build_overlapping_paragraphs,
    build_overlapping_sentences, build_plain_paragraphs, build_plain_sentences, build_section,
    IdAllocator, SentenceContext,
};
use super::helpers::{detect_paragraphs, detect_sections, detect_sentences};

/// Chunks one document and keeps the result for context lookups.
///
/// Each instance owns its fragment list and lookup table; chunk concurrent
/// documents with separate instances.
#[derive(Debug, Clone)]
pub struct HierarchicalChunker {
    doc_id: String,
    title: String,
    config: ChunkingConfig,
    fragments: Vec<Fragment>,
    /// Fragment id → position in `fragments`.
    lookup: HashMap<FragmentId, usize>,
}

impl HierarchicalChunker {
    pub fn new(doc_id: impl Into<String>, title: impl Into<String>, config: ChunkingConfig) -> Self {
        Self {
            doc_id: doc_id.into(),
            title: title.into(),
            config,
            fragments: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk `text` with the configured strategy, replacing any previous run.
    /// Returns every fragment created, in creation order.
    pub fn chunk_document(&mut self, text: &str) -> &[Fragment] {
        if !self.fragments.is_empty() {
            debug!(doc_id = %self.doc_id, "discarding previous chunking run");
        }
        self.fragments.clear();
        self.lookup.clear();

        let mut ids = IdAllocator::new(&self.doc_id);
        match self.config.strategy {
            ChunkStrategy::FixedSize => self.chunk_fixed(text, &mut ids),
            strategy => self.chunk_hierarchical(text, strategy.uses_overlap(), &mut ids),
        }

        debug!(
            doc_id = %self.doc_id,
            strategy = %self.config.strategy,
            fragments = self.fragments.len(),
            "chunked document"
        );
        &self.fragments
    }

    fn chunk_hierarchical(&mut self, text: &str, overlap: bool, ids: &mut IdAllocator) {
        let root = build_document(ids.document_id(), text, &self.title);
        let root_id = root.id.clone();
        self.register(root);

        let fallback = Some(self.title.as_str()).filter(|t| !t.trim().is_empty());
        let sections = detect_sections(text, fallback);

        for section in &sections {
            let section_fragment = build_section(section, &root_id, ids);
            let section_id = section_fragment.id.clone();
            self.register(section_fragment);

            let paragraphs = detect_paragraphs(&section.content);
            let paragraph_fragments = if overlap {
                build_overlapping_paragraphs(
                    &paragraphs,
                    &section_id,
                    &section.title,
                    &self.config,
                    ids,
                )
            } else {
                build_plain_paragraphs(&paragraphs, &section_id, ids)
            };

            for paragraph in paragraph_fragments {
                let paragraph_id = paragraph.id.clone();
                // Re-segment the untouched text, never the augmented content.
                let core = paragraph.core_content().to_string();
                self.register(paragraph);

                let sentences = detect_sentences(&core);
                let sentence_fragments = if overlap {
                    let context = SentenceContext {
                        section_title: &section.title,
                        paragraph: &core,
                    };
                    build_overlapping_sentences(
                        &sentences,
                        &paragraph_id,
                        &context,
                        &self.config,
                        ids,
                    )
                } else {
                    build_plain_sentences(&sentences, &paragraph_id, ids)
                };

                for sentence in sentence_fragments {
                    self.register(sentence);
                }
            }
        }

        debug!(
            doc_id = %self.doc_id,
            sections = sections.len(),
            overlap,
            "built hierarchy"
        );
    }

    fn chunk_fixed(&mut self, text: &str, ids: &mut IdAllocator) {
        let window = self.config.effective_fixed_chunk_size();
        for fragment in build_fixed_windows(text, window, ids) {
            self.register(fragment);
        }
    }

    /// Record a fragment in the list and lookup table and link it under its parent.
    fn register(&mut self, fragment: Fragment) {
        if let Some(parent_id) = &fragment.parent_id {
            match self.lookup.get(parent_id) {
                Some(&pos) => self.fragments[pos].children_ids.push(fragment.id.clone()),
                None => warn!(id = %fragment.id, parent = %parent_id, "parent not registered"),
            }
        }
        self.lookup.insert(fragment.id.clone(), self.fragments.len());
        self.fragments.push(fragment);
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// All fragments from the last run, in creation order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Fragment> {
        self.lookup.get(id).map(|&pos| &self.fragments[pos])
    }

    pub fn parent_of(&self, fragment: &Fragment) -> Option<&Fragment> {
        fragment.parent_id.as_deref().and_then(|id| self.get(id))
    }

    /// Immediate children of `id` in document order.
    pub fn children(&self, id: &str) -> Vec<&Fragment> {
        self.get(id)
            .map(|f| f.children_ids.iter().filter_map(|c| self.get(c)).collect())
            .unwrap_or_default()
    }

    /// The root fragment, absent for fixed-size runs.
    pub fn document(&self) -> Option<&Fragment> {
        self.fragments
            .first()
            .filter(|f| f.level() == FragmentLevel::Document)
    }

    pub fn fragments_at(&self, level: FragmentLevel) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(move |f| f.level() == level)
    }
}
