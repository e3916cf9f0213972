//! Segmenters and text-window utilities used by the fragment builders.
//!
//! Boundary detection is purely structural: header markers, blank lines and
//! terminal punctuation. Abbreviations ("e.g. this") and decimals ("3. 5")
//! followed by whitespace are split like sentence ends.

use super::types::{ParagraphBlock, SectionBlock, SentenceBlock};

/// Title for text that precedes the first header.
pub(crate) const INTRODUCTION_TITLE: &str = "Introduction";
/// Title for headerless text when no document title was given.
pub(crate) const MAIN_CONTENT_TITLE: &str = "Main Content";

const MAX_HEADER_LEVEL: usize = 3;

/// Whitespace-delimited word count.
pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `n` characters of `s` (all of `s` if shorter).
pub(crate) fn head_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(i, _)| &s[..i])
}

/// Last `n` characters of `s` (all of `s` if shorter).
pub(crate) fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    s.char_indices().rev().nth(n - 1).map_or(s, |(i, _)| &s[i..])
}

/// Parse a header line: 1-3 leading `#`, optional whitespace, non-empty title.
///
/// `####` and deeper return `None` and stay part of the surrounding text.
pub fn parse_header(line: &str) -> Option<(u8, &str)> {
    let markers = line.bytes().take_while(|&b| b == b'#').count();
    if markers == 0 || markers > MAX_HEADER_LEVEL {
        return None;
    }
    let title = line[markers..].trim();
    if title.is_empty() {
        return None;
    }
    Some((markers as u8, title))
}

struct HeaderLine<'a> {
    /// Byte offset of the header line itself.
    start: usize,
    /// Byte offset just past the header line.
    body_start: usize,
    level: u8,
    title: &'a str,
}

/// Split a document into header-delimited sections.
///
/// Text before the first header becomes an "Introduction" section. Text with
/// no headers at all becomes one section titled `fallback_title` (or
/// "Main Content"). Whitespace-only text yields no sections.
pub fn detect_sections(text: &str, fallback_title: Option<&str>) -> Vec<SectionBlock> {
    let mut headers = Vec::new();
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let bare = line.trim_end_matches(&['\n', '\r'][..]);
        if let Some((level, title)) = parse_header(bare) {
            headers.push(HeaderLine {
                start: offset,
                body_start: offset + line.len(),
                level,
                title,
            });
        }
        offset += line.len();
    }

    if headers.is_empty() {
        let body = text.trim();
        if body.is_empty() {
            return Vec::new();
        }
        let title = fallback_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(MAIN_CONTENT_TITLE);
        return vec![SectionBlock {
            title: title.to_string(),
            content: body.to_string(),
            level: 1,
        }];
    }

    let mut sections = Vec::with_capacity(headers.len() + 1);

    let preamble = text[..headers[0].start].trim();
    if !preamble.is_empty() {
        sections.push(SectionBlock {
            title: INTRODUCTION_TITLE.to_string(),
            content: preamble.to_string(),
            level: 1,
        });
    }

    for (i, header) in headers.iter().enumerate() {
        let end = headers.get(i + 1).map_or(text.len(), |next| next.start);
        sections.push(SectionBlock {
            title: header.title.to_string(),
            content: text[header.body_start..end].trim().to_string(),
            level: header.level,
        });
    }

    sections
}

/// Split section text on blank lines (`\n\n`), dropping empty pieces.
pub fn detect_paragraphs(text: &str) -> Vec<ParagraphBlock> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(index, p)| ParagraphBlock {
            content: p.to_string(),
            index,
            word_count: count_words(p),
        })
        .collect()
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split paragraph text at whitespace runs that follow `.`, `!` or `?`.
/// The terminator stays with the preceding sentence.
pub fn detect_sentences(text: &str) -> Vec<SentenceBlock> {
    let mut sentences = Vec::new();
    let mut push = |piece: &str| {
        let piece = piece.trim();
        if !piece.is_empty() {
            sentences.push(SentenceBlock {
                content: piece.to_string(),
                index: sentences.len(),
                char_count: piece.chars().count(),
            });
        }
    };

    let mut start = 0usize;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && prev.is_some_and(is_terminal) {
            push(&text[start..i]);
            // Swallow the rest of the whitespace run.
            let mut end = i + c.len_utf8();
            while let Some(&(j, w)) = chars.peek() {
                if !w.is_whitespace() {
                    break;
                }
                end = j + w.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    push(&text[start..]);

    sentences
}
