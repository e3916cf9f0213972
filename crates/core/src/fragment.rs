//! Fragment model: the nodes of a chunked document.
//!
//! A fragment's level is carried by its metadata variant, so a section can
//! never hold paragraph fields. On the wire a fragment is the flat record
//! `{id, content, level, parent_id, children_ids, metadata}`; decoding picks
//! the metadata shape from `level`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::StrataError;

/// Fragment identifier, unique within one chunking run.
pub type FragmentId = String;

// ── Level ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentLevel {
    Document,
    Section,
    Paragraph,
    Sentence,
    Fixed,
}

impl FragmentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentLevel::Document => "document",
            FragmentLevel::Section => "section",
            FragmentLevel::Paragraph => "paragraph",
            FragmentLevel::Sentence => "sentence",
            FragmentLevel::Fixed => "fixed",
        }
    }

    /// Short tag used inside fragment ids (`<doc>_<tag>_<n>`).
    pub fn id_tag(&self) -> &'static str {
        match self {
            FragmentLevel::Document => "doc",
            FragmentLevel::Section => "section",
            FragmentLevel::Paragraph => "para",
            FragmentLevel::Sentence => "sent",
            FragmentLevel::Fixed => "fixed",
        }
    }
}

impl fmt::Display for FragmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FragmentLevel {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(FragmentLevel::Document),
            "section" => Ok(FragmentLevel::Section),
            "paragraph" => Ok(FragmentLevel::Paragraph),
            "sentence" => Ok(FragmentLevel::Sentence),
            "fixed" => Ok(FragmentLevel::Fixed),
            other => Err(StrataError::InvalidLevel(other.to_string())),
        }
    }
}

// ── Overlap bookkeeping ───────────────────────────────────────

/// Which neighbor contributed injected text, and how much of it.
///
/// Rendered as the tags `prev_para_<n>_sentences`, `next_para_<n>_sentences`,
/// `prev_sent_<n>_chars` and `next_sent_<n>_chars`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum OverlapSource {
    PreviousParagraph { sentences: usize },
    NextParagraph { sentences: usize },
    PreviousSentence { chars: usize },
    NextSentence { chars: usize },
}

impl fmt::Display for OverlapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapSource::PreviousParagraph { sentences } => {
                write!(f, "prev_para_{sentences}_sentences")
            }
            OverlapSource::NextParagraph { sentences } => {
                write!(f, "next_para_{sentences}_sentences")
            }
            OverlapSource::PreviousSentence { chars } => write!(f, "prev_sent_{chars}_chars"),
            OverlapSource::NextSentence { chars } => write!(f, "next_sent_{chars}_chars"),
        }
    }
}

fn parse_tag(s: &str, prefix: &str, suffix: &str) -> Option<usize> {
    s.strip_prefix(prefix)?.strip_suffix(suffix)?.parse().ok()
}

impl FromStr for OverlapSource {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(sentences) = parse_tag(s, "prev_para_", "_sentences") {
            Ok(OverlapSource::PreviousParagraph { sentences })
        } else if let Some(sentences) = parse_tag(s, "next_para_", "_sentences") {
            Ok(OverlapSource::NextParagraph { sentences })
        } else if let Some(chars) = parse_tag(s, "prev_sent_", "_chars") {
            Ok(OverlapSource::PreviousSentence { chars })
        } else if let Some(chars) = parse_tag(s, "next_sent_", "_chars") {
            Ok(OverlapSource::NextSentence { chars })
        } else {
            Err(StrataError::InvalidOverlapSource(s.to_string()))
        }
    }
}

impl From<OverlapSource> for String {
    fn from(source: OverlapSource) -> Self {
        source.to_string()
    }
}

impl TryFrom<String> for OverlapSource {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlapInfo {
    pub has_overlap: bool,
    pub overlap_source: Vec<OverlapSource>,
}

impl OverlapInfo {
    pub fn record(&mut self, source: OverlapSource) {
        self.has_overlap = true;
        self.overlap_source.push(source);
    }
}

// ── Per-level metadata ────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentMeta {
    pub title: String,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
    /// Absent means retrievable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrievable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionMeta {
    pub title: String,
    pub header_level: u8,
    pub word_count: usize,
    #[serde(default)]
    pub retrievable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParagraphMeta {
    /// Paragraph text before any injected context.
    pub core_content: String,
    pub paragraph_index: usize,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_context: bool,
    #[serde(default = "default_true")]
    pub retrievable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap_info: Option<OverlapInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentenceMeta {
    /// Sentence text before any injected context.
    pub core_content: String,
    pub sentence_index: usize,
    pub char_count: usize,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_context: bool,
    #[serde(default = "default_true")]
    pub retrievable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap_info: Option<OverlapInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedMeta {
    /// Word offset of the first word in the window.
    pub start_index: usize,
    /// Word offset one past the last word in the window.
    pub end_index: usize,
    pub word_count: usize,
    #[serde(default = "default_true")]
    pub retrievable: bool,
}

/// Level-specific metadata. Serializes as the flat field map of its variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FragmentMetadata {
    Document(DocumentMeta),
    Section(SectionMeta),
    Paragraph(ParagraphMeta),
    Sentence(SentenceMeta),
    Fixed(FixedMeta),
}

impl FragmentMetadata {
    pub fn level(&self) -> FragmentLevel {
        match self {
            FragmentMetadata::Document(_) => FragmentLevel::Document,
            FragmentMetadata::Section(_) => FragmentLevel::Section,
            FragmentMetadata::Paragraph(_) => FragmentLevel::Paragraph,
            FragmentMetadata::Sentence(_) => FragmentLevel::Sentence,
            FragmentMetadata::Fixed(_) => FragmentLevel::Fixed,
        }
    }

    /// Whether the fragment is an embedding candidate. A document fragment
    /// without an explicit flag counts as retrievable.
    pub fn retrievable(&self) -> bool {
        match self {
            FragmentMetadata::Document(m) => m.retrievable.unwrap_or(true),
            FragmentMetadata::Section(m) => m.retrievable,
            FragmentMetadata::Paragraph(m) => m.retrievable,
            FragmentMetadata::Sentence(m) => m.retrievable,
            FragmentMetadata::Fixed(m) => m.retrievable,
        }
    }

    pub fn core_content(&self) -> Option<&str> {
        match self {
            FragmentMetadata::Paragraph(m) => Some(&m.core_content),
            FragmentMetadata::Sentence(m) => Some(&m.core_content),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            FragmentMetadata::Document(m) => Some(&m.title),
            FragmentMetadata::Section(m) => Some(&m.title),
            _ => None,
        }
    }

    pub fn overlap_info(&self) -> Option<&OverlapInfo> {
        match self {
            FragmentMetadata::Paragraph(m) => m.overlap_info.as_ref(),
            FragmentMetadata::Sentence(m) => m.overlap_info.as_ref(),
            _ => None,
        }
    }
}

// ── Fragment ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FragmentRecord")]
pub struct Fragment {
    pub id: FragmentId,
    pub content: String,
    /// `None` for the document root and for fixed-size windows.
    pub parent_id: Option<FragmentId>,
    /// Immediate descendants in document order.
    pub children_ids: Vec<FragmentId>,
    pub metadata: FragmentMetadata,
}

impl Fragment {
    pub fn new(
        id: impl Into<FragmentId>,
        content: impl Into<String>,
        parent_id: Option<FragmentId>,
        metadata: FragmentMetadata,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            parent_id,
            children_ids: Vec::new(),
            metadata,
        }
    }

    pub fn level(&self) -> FragmentLevel {
        self.metadata.level()
    }

    pub fn is_retrievable(&self) -> bool {
        self.metadata.retrievable()
    }

    /// Untouched segment text for paragraphs and sentences, `content` otherwise.
    pub fn core_content(&self) -> &str {
        self.metadata.core_content().unwrap_or(&self.content)
    }
}

/// Owned wire form of a fragment, with metadata left as raw JSON until the
/// level is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub id: FragmentId,
    pub content: String,
    pub level: FragmentLevel,
    pub parent_id: Option<FragmentId>,
    #[serde(default)]
    pub children_ids: Vec<FragmentId>,
    pub metadata: serde_json::Value,
}

#[derive(Serialize)]
struct FragmentRecordRef<'a> {
    id: &'a str,
    content: &'a str,
    level: FragmentLevel,
    parent_id: Option<&'a str>,
    children_ids: &'a [FragmentId],
    metadata: &'a FragmentMetadata,
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FragmentRecordRef {
            id: &self.id,
            content: &self.content,
            level: self.level(),
            parent_id: self.parent_id.as_deref(),
            children_ids: &self.children_ids,
            metadata: &self.metadata,
        }
        .serialize(serializer)
    }
}

fn decode_meta<T: DeserializeOwned>(
    level: FragmentLevel,
    value: serde_json::Value,
) -> Result<T, StrataError> {
    serde_json::from_value(value).map_err(|e| StrataError::MetadataMismatch {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

impl TryFrom<FragmentRecord> for Fragment {
    type Error = StrataError;

    fn try_from(record: FragmentRecord) -> Result<Self, Self::Error> {
        let level = record.level;
        let metadata = match level {
            FragmentLevel::Document => {
                FragmentMetadata::Document(decode_meta(level, record.metadata)?)
            }
            FragmentLevel::Section => {
                FragmentMetadata::Section(decode_meta(level, record.metadata)?)
            }
            FragmentLevel::Paragraph => {
                FragmentMetadata::Paragraph(decode_meta(level, record.metadata)?)
            }
            FragmentLevel::Sentence => {
                FragmentMetadata::Sentence(decode_meta(level, record.metadata)?)
            }
            FragmentLevel::Fixed => FragmentMetadata::Fixed(decode_meta(level, record.metadata)?),
        };

        Ok(Fragment {
            id: record.id,
            content: record.content,
            parent_id: record.parent_id,
            children_ids: record.children_ids,
            metadata,
        })
    }
}
