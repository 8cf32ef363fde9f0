//! Read policy — full text or summary, and what a summary covers.
//!
//! The decision is a two-outcome state machine driven by the requested mode:
//!
//! | requested | outcome |
//! |-----------|---------|
//! | `full`    | full, always |
//! | `summary` | summary, always |
//! | `auto`    | summary when tokens exceed the threshold, else full |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{SummaryParts, SummaryStyle};

/// Token count above which `auto` mode summarizes.
pub const DEFAULT_TOKEN_THRESHOLD: usize = 10_000;

/// Use cases a structured summary is adequate for.
pub const RECOMMENDED_FOR: [&str; 3] = ["initial_understanding", "overview", "triage"];

/// Use cases that need the full text.
pub const NOT_RECOMMENDED_FOR: [&str; 3] = ["detailed_analysis", "citation", "implementation"];

/// The mode a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Summarize only documents above the threshold.
    #[default]
    Auto,
    /// Never summarize.
    Full,
    /// Always summarize.
    Summary,
}

/// A mode string that is not `auto`, `full` or `summary`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown read mode {0:?} (expected \"auto\", \"full\" or \"summary\")")]
pub struct UnknownMode(pub String);

impl FromStr for ReadMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ReadMode::Auto),
            "full" => Ok(ReadMode::Full),
            "summary" => Ok(ReadMode::Summary),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadMode::Auto => write!(f, "auto"),
            ReadMode::Full => write!(f, "full"),
            ReadMode::Summary => write!(f, "summary"),
        }
    }
}

/// What a read actually returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Full,
    Summary,
}

/// The outcome of the policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadDecision {
    /// Full text or summary.
    pub kind: OutputKind,
    /// Style a summary is composed in.
    pub style: SummaryStyle,
}

/// Apply the read policy.
pub fn decide(
    requested: ReadMode,
    tokens: usize,
    threshold: usize,
    style: SummaryStyle,
) -> ReadDecision {
    let kind = match requested {
        ReadMode::Full => OutputKind::Full,
        ReadMode::Summary => OutputKind::Summary,
        ReadMode::Auto if tokens > threshold => OutputKind::Summary,
        ReadMode::Auto => OutputKind::Full,
    };
    ReadDecision { kind, style }
}

/// `original / summary`, unclamped; 0.0 when the summary has no tokens.
pub fn reduction_factor(original_tokens: usize, summary_tokens: usize) -> f64 {
    if summary_tokens == 0 {
        0.0
    } else {
        original_tokens as f64 / summary_tokens as f64
    }
}

/// `summary / original`; 0.0 when the original has no tokens.
pub fn completeness_score(original_tokens: usize, summary_tokens: usize) -> f64 {
    if original_tokens == 0 {
        0.0
    } else {
        summary_tokens as f64 / original_tokens as f64
    }
}

/// Content categories a summary carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedContent {
    #[serde(rename = "abstract")]
    pub abstract_text: bool,
    pub keywords: bool,
    pub section_headers: bool,
    pub key_findings: bool,
}

/// Content categories a summary always leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedContent {
    pub detailed_methods: bool,
    pub complete_citations: bool,
    pub code_examples: bool,
    pub tables_and_figures: bool,
}

impl Default for ExcludedContent {
    fn default() -> Self {
        Self {
            detailed_methods: true,
            complete_citations: true,
            code_examples: true,
            tables_and_figures: true,
        }
    }
}

/// What a summary includes and omits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub included: IncludedContent,
    pub excluded: ExcludedContent,
    pub completeness_score: f64,
}

impl Coverage {
    /// Coverage of a summary built from `parts`.
    pub fn of(parts: &SummaryParts, original_tokens: usize, summary_tokens: usize) -> Self {
        Self {
            included: IncludedContent {
                abstract_text: parts.abstract_text.is_some(),
                keywords: !parts.keywords.is_empty(),
                section_headers: !parts.headers.is_empty(),
                key_findings: !parts.key_points.is_empty(),
            },
            excluded: ExcludedContent::default(),
            completeness_score: completeness_score(original_tokens, summary_tokens),
        }
    }
}

/// Guidance on what a summary is good enough for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub completeness: f64,
    pub recommended_for: Vec<String>,
    pub not_recommended_for: Vec<String>,
}

impl Confidence {
    pub fn new(original_tokens: usize, summary_tokens: usize) -> Self {
        Self {
            completeness: completeness_score(original_tokens, summary_tokens),
            recommended_for: RECOMMENDED_FOR.iter().map(|s| s.to_string()).collect(),
            not_recommended_for: NOT_RECOMMENDED_FOR.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Human-readable warning shown ahead of a summary.
///
/// `source` names the document in the drill-down hints (usually its path).
pub fn format_preamble(original_tokens: usize, summary_tokens: usize, source: &str) -> String {
    let reduction = reduction_factor(original_tokens, summary_tokens);
    format!(
        "DOCUMENT SUMMARY (NOT FULL CONTENT)
Original: {original_tokens} tokens -> Summary: {summary_tokens} tokens
Reduction: {reduction:.1}x

This summary may omit:
  - Detailed arguments and nuances
  - Specific examples, data, equations
  - Citations and references
  - Methodological details
  - Code examples

TO GET MORE DETAIL:
  - read_section('{source}', 'section_name')  - Read a specific section
  - list_sections('{source}')  - See all sections
  - smart_read('{source}', mode='full')  - Get the complete content

WHEN TO REQUEST MORE:
  -> Detailed arguments: request specific sections
  -> Citations: request full content or the bibliography section
  -> Implementation details: request methods or code sections
  -> Overview is enough: use this summary
"
    )
}
