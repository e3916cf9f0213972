//! Context resolution: fetch a fragment's text at a coarser granularity.

use std::fmt;

use strata_core::{Fragment, FragmentLevel};

use super::strategies::HierarchicalChunker;

/// Hierarchy depth (document, section, paragraph, sentence) bounds any
/// upward walk.
const MAX_DEPTH: usize = 4;

/// Granularity requested from [`HierarchicalChunker::get_chunk_with_context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextLevel {
    Section,
    Paragraph,
    Sentence,
}

/// Lenient: anything other than "section" or "paragraph" means sentence.
impl From<&str> for ContextLevel {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "section" => ContextLevel::Section,
            "paragraph" => ContextLevel::Paragraph,
            _ => ContextLevel::Sentence,
        }
    }
}

impl fmt::Display for ContextLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContextLevel::Section => "section",
            ContextLevel::Paragraph => "paragraph",
            ContextLevel::Sentence => "sentence",
        })
    }
}

impl HierarchicalChunker {
    /// Content of `fragment_id` at the requested granularity.
    ///
    /// Unknown ids give an empty string; a broken or missing ancestor falls
    /// back to the fragment's own content.
    pub fn get_chunk_with_context(&self, fragment_id: &str, level: ContextLevel) -> &str {
        let Some(fragment) = self.get(fragment_id) else {
            return "";
        };

        match level {
            ContextLevel::Section => {
                &self.enclosing_section(fragment).unwrap_or(fragment).content
            }
            ContextLevel::Paragraph if fragment.level() == FragmentLevel::Sentence => {
                &self.parent_of(fragment).unwrap_or(fragment).content
            }
            ContextLevel::Paragraph | ContextLevel::Sentence => &fragment.content,
        }
    }

    /// Nearest section at or above `fragment`.
    pub fn enclosing_section<'a>(&'a self, fragment: &'a Fragment) -> Option<&'a Fragment> {
        let mut current = fragment;
        for _ in 0..MAX_DEPTH {
            if current.level() == FragmentLevel::Section {
                return Some(current);
            }
            current = self.parent_of(current)?;
        }
        None
    }
}
