//! Response types for the three reader operations.
//!
//! These serialize to the JSON shapes handed back to the calling agent.
//! Every outcome, including a missing section, is a value rather than an
//! error.

use serde::{Deserialize, Serialize};

use crate::policy::{Confidence, Coverage};

/// Result of a read: the full text, or a summary with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReadResponse {
    Full(FullRead),
    Summary(SummaryRead),
}

impl ReadResponse {
    /// The returned text, full or summarized.
    pub fn content(&self) -> &str {
        match self {
            ReadResponse::Full(full) => &full.content,
            ReadResponse::Summary(summary) => &summary.content,
        }
    }

    /// Was the document summarized?
    pub fn is_summary(&self) -> bool {
        matches!(self, ReadResponse::Summary(_))
    }
}

/// The unmodified document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullRead {
    pub content: String,
    pub tokens: usize,
}

/// A summary and the metadata that qualifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRead {
    pub content: String,
    pub style: String,
    pub original_tokens: usize,
    pub summary_tokens: usize,
    pub reduction_factor: f64,
    pub sections: SectionsInfo,
    pub coverage: Coverage,
    pub confidence: Confidence,
}

/// Heading overview attached to a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionsInfo {
    /// Total headings in the document.
    pub count: usize,
    /// Leading heading titles (capped).
    pub headers: Vec<String>,
    pub note: String,
}

/// Result of a section lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SectionResponse {
    #[serde(rename = "section")]
    Found(SectionContent),
    #[serde(rename = "error")]
    NotFound(SectionMissing),
}

/// A located section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub content: String,
    pub heading: String,
    pub heading_level: u8,
    pub tokens: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// No heading matched; the query is echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMissing {
    pub error: String,
    pub section: String,
}

/// Table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionList {
    pub sections: Vec<String>,
    pub count: usize,
}
