//! Segmenter output types.

/// A header-delimited block of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    /// Header text without markers.
    pub title: String,
    /// Text between this header and the next, trimmed.
    pub content: String,
    /// Header marker count, 1..=3.
    pub level: u8,
}

/// A blank-line-delimited block within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphBlock {
    pub content: String,
    /// Position among non-empty paragraphs of the section.
    pub index: usize,
    pub word_count: usize,
}

/// A punctuation-delimited run within a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceBlock {
    pub content: String,
    /// Position among non-empty sentences of the paragraph.
    pub index: usize,
    /// Length in characters (not bytes).
    pub char_count: usize,
}
