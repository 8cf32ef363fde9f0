//! Section indexer — heading extraction and section boundary resolution.
//!
//! A heading is a line that starts with 1–6 `#` markers, then at least one
//! space or tab, then non-empty text. Nothing else is a heading: `#Title`,
//! `####### deep` and a bare `##` are all ordinary content of whatever
//! section encloses them. Fenced code blocks are not special-cased, so a
//! `# comment` line inside a fence is indexed like any other heading.
//!
//! A section runs from its heading to the next heading of the same or a
//! shallower level, so it contains all of its deeper subsections.

use serde::{Deserialize, Serialize};

/// A heading found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingDescriptor {
    /// Nesting depth, 1 for `#` through 6 for `######`.
    pub level: u8,
    /// Heading text without markers or surrounding whitespace.
    pub title: String,
    /// Byte offset of the first marker character.
    pub start_offset: usize,
    /// Line number of the heading (1-indexed).
    pub line_number: usize,
}

/// The span of text governed by one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// The heading that opens this section.
    pub heading: HeadingDescriptor,
    /// Heading line plus body, trailing whitespace trimmed.
    pub content: String,
    /// Line of the heading (1-indexed).
    pub start_line: usize,
    /// Line holding the last character of `content` (1-indexed).
    pub end_line: usize,
    /// Byte offset just past the end of `content`.
    pub end_offset: usize,
}

impl Section {
    /// The section text without its heading line.
    pub fn body(&self) -> &str {
        match self.content.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        }
    }
}

/// No heading title contains the query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Section '{query}' not found")]
pub struct SectionNotFound {
    /// The query exactly as the caller supplied it.
    pub query: String,
}

/// Parse a single line as a heading, returning `(level, title)`.
///
/// A trailing `\r` is ignored so CRLF documents index the same as LF ones.
pub fn parse_heading_line(line: &str) -> Option<(u8, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let markers = line.bytes().take_while(|&b| b == b'#').count();
    if markers == 0 || markers > 6 {
        return None;
    }
    let rest = &line[markers..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        None
    } else {
        Some((markers as u8, title))
    }
}

/// Scan `text` for headings, in document order.
pub fn index(text: &str) -> Vec<HeadingDescriptor> {
    let mut headings = Vec::new();
    let mut offset = 0;
    for (line_idx, raw) in text.split_inclusive('\n').enumerate() {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        if let Some((level, title)) = parse_heading_line(line) {
            headings.push(HeadingDescriptor {
                level,
                title: title.to_string(),
                start_offset: offset,
                line_number: line_idx + 1,
            });
        }
        offset += raw.len();
    }
    headings
}

/// Find the first section whose title contains `query`, ignoring case.
pub fn find_section(text: &str, query: &str) -> Result<Section, SectionNotFound> {
    SectionIndex::new(text).find(query)
}

/// Headings of one document, with boundary resolution over the same text.
#[derive(Debug, Clone)]
pub struct SectionIndex<'a> {
    text: &'a str,
    headings: Vec<HeadingDescriptor>,
}

impl<'a> SectionIndex<'a> {
    /// Index `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            headings: index(text),
        }
    }

    /// All headings in document order.
    pub fn headings(&self) -> &[HeadingDescriptor] {
        &self.headings
    }

    /// Heading titles in document order.
    pub fn titles(&self) -> Vec<String> {
        self.headings.iter().map(|h| h.title.clone()).collect()
    }

    /// Titles of headings no deeper than `max_level`.
    pub fn titles_up_to(&self, max_level: u8) -> Vec<String> {
        self.headings
            .iter()
            .filter(|h| h.level <= max_level)
            .map(|h| h.title.clone())
            .collect()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Does the document have no headings?
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Index of the first heading whose title contains `query`, ignoring case.
    ///
    /// Duplicate titles are not disambiguated; the earliest one wins.
    pub fn position(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        self.headings
            .iter()
            .position(|h| h.title.to_lowercase().contains(&query))
    }

    /// Resolve the section opened by the heading at index `i`.
    pub fn section(&self, i: usize) -> Option<Section> {
        let heading = self.headings.get(i)?;
        let end = self.headings[i + 1..]
            .iter()
            .find(|next| next.level <= heading.level)
            .map_or(self.text.len(), |next| next.start_offset);

        let content = self.text[heading.start_offset..end].trim_end();
        let end_line = heading.line_number + content.matches('\n').count();
        Some(Section {
            heading: heading.clone(),
            content: content.to_string(),
            start_line: heading.line_number,
            end_line,
            end_offset: heading.start_offset + content.len(),
        })
    }

    /// Section lookup by case-insensitive title substring, first match wins.
    pub fn find(&self, query: &str) -> Result<Section, SectionNotFound> {
        self.position(query)
            .and_then(|i| self.section(i))
            .ok_or_else(|| SectionNotFound {
                query: query.to_string(),
            })
    }

    /// Every heading's section, in document order.
    pub fn sections(&self) -> Vec<Section> {
        (0..self.headings.len())
            .filter_map(|i| self.section(i))
            .collect()
    }
}
