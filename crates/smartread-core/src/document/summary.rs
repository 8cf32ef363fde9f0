//! Summary composition.
//!
//! The `structured` style renders, in order: a keyword line, an abstract
//! excerpt, a section list and a key-point list, separated by blank lines.
//! Parts that come out empty are left out. When every part is empty, and for
//! any style other than `structured`, the summary is the leading slice of the
//! raw text instead.
//!
//! With a token ceiling set, trailing key points and then trailing headers are
//! dropped until the rendered summary fits.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use smartread_config::SummaryConfig;

use super::extract::{DEFAULT_KEY_POINTS, extract_abstract, extract_key_points, extract_keywords};
use super::sections::SectionIndex;
use crate::tokenizer::TokenCounter;

/// Marker appended to anything cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// How a summary is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryStyle {
    /// Keywords, abstract, headers and key points.
    #[default]
    Structured,
    /// Key sentences only. Not rendered yet; degrades to the raw-text fallback.
    Extractive,
    /// Abstract only. Not rendered yet; degrades to the raw-text fallback.
    Abstract,
    /// Any other requested name; degrades to the raw-text fallback.
    Other(String),
}

impl SummaryStyle {
    /// Map a style name onto a style, case-insensitively.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "structured" => SummaryStyle::Structured,
            "extractive" => SummaryStyle::Extractive,
            "abstract" => SummaryStyle::Abstract,
            _ => SummaryStyle::Other(name.to_string()),
        }
    }

    /// The style name as reported in responses.
    pub fn as_str(&self) -> &str {
        match self {
            SummaryStyle::Structured => "structured",
            SummaryStyle::Extractive => "extractive",
            SummaryStyle::Abstract => "abstract",
            SummaryStyle::Other(name) => name,
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits applied while composing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Keywords on the keyword line (`None` = all).
    pub max_keywords_shown: Option<usize>,
    /// Abstract excerpt length in characters.
    pub abstract_chars: usize,
    /// Section headers listed.
    pub max_headers: usize,
    /// Deepest heading level listed.
    pub header_max_level: u8,
    /// Key sentences selected.
    pub key_points: usize,
    /// Key sentence length in characters.
    pub key_point_chars: usize,
    /// Raw-text fallback length in characters.
    pub fallback_chars: usize,
    /// Token ceiling for the rendered summary.
    pub max_summary_tokens: Option<usize>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_keywords_shown: None,
            abstract_chars: 500,
            max_headers: 15,
            header_max_level: 3,
            key_points: DEFAULT_KEY_POINTS,
            key_point_chars: 200,
            fallback_chars: 1000,
            max_summary_tokens: None,
        }
    }
}

impl From<&SummaryConfig> for SummaryOptions {
    fn from(config: &SummaryConfig) -> Self {
        let nonzero = |n: usize| (n > 0).then_some(n);
        Self {
            max_keywords_shown: nonzero(config.max_keywords_shown),
            abstract_chars: config.abstract_chars,
            max_headers: config.max_headers,
            header_max_level: config.header_max_level,
            key_points: config.key_points,
            key_point_chars: config.key_point_chars,
            fallback_chars: config.fallback_chars,
            max_summary_tokens: nonzero(config.max_summary_tokens),
        }
    }
}

/// Content extracted for a summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryParts {
    /// Keywords in document order.
    pub keywords: Vec<String>,
    /// Full abstract text, before excerpting.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Section headers shown.
    pub headers: Vec<String>,
    /// Key sentences, in document order.
    pub key_points: Vec<String>,
}

impl SummaryParts {
    /// Extract every part from `text` under `options`.
    pub fn extract(text: &str, options: &SummaryOptions) -> Self {
        let mut keywords = extract_keywords(text);
        if let Some(max) = options.max_keywords_shown {
            keywords.truncate(max);
        }
        let mut headers = SectionIndex::new(text).titles_up_to(options.header_max_level);
        headers.truncate(options.max_headers);

        Self {
            keywords,
            abstract_text: extract_abstract(text),
            headers,
            key_points: extract_key_points(text, options.key_points),
        }
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.abstract_text.is_none()
            && self.headers.is_empty()
            && self.key_points.is_empty()
    }
}

/// A composed summary and the parts it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Rendered summary text.
    pub text: String,
    /// Parts that made it into `text`.
    pub parts: SummaryParts,
    /// Whether `text` is the raw-text fallback.
    pub fallback: bool,
}

/// Cut `s` to at most `max_chars` characters, marking the cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", s[..cut].trim_end()),
        None => s.to_string(),
    }
}

fn leading_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => &s[..cut],
        None => s,
    }
}

/// Builds summaries for one set of [`SummaryOptions`].
#[derive(Debug, Clone, Default)]
pub struct SummaryComposer {
    options: SummaryOptions,
}

impl SummaryComposer {
    /// Create a composer with the given limits.
    pub fn new(options: SummaryOptions) -> Self {
        Self { options }
    }

    /// The limits this composer applies.
    pub fn options(&self) -> &SummaryOptions {
        &self.options
    }

    /// Summarize `text` in `style`, measuring against `counter` when a token
    /// ceiling is configured.
    pub fn compose(&self, text: &str, style: &SummaryStyle, counter: &dyn TokenCounter) -> Summary {
        if *style != SummaryStyle::Structured {
            warn!(%style, "Summary style not implemented, using leading text");
            return self.fallback(text, SummaryParts::default());
        }

        let parts = SummaryParts::extract(text, &self.options);
        if parts.is_empty() {
            debug!("Nothing extractable, using leading text");
            return self.fallback(text, parts);
        }

        let parts = self.fit_budget(parts, counter);
        Summary {
            text: self.render(&parts),
            parts,
            fallback: false,
        }
    }

    fn fallback(&self, text: &str, parts: SummaryParts) -> Summary {
        Summary {
            text: leading_chars(text, self.options.fallback_chars).to_string(),
            parts,
            fallback: true,
        }
    }

    fn fit_budget(&self, mut parts: SummaryParts, counter: &dyn TokenCounter) -> SummaryParts {
        let Some(limit) = self.options.max_summary_tokens else {
            return parts;
        };
        loop {
            let tokens = counter.count(&self.render(&parts));
            if tokens <= limit {
                break;
            }
            if parts.key_points.pop().is_none() && parts.headers.pop().is_none() {
                debug!(tokens, limit, "Summary still over budget with nothing left to drop");
                break;
            }
        }
        parts
    }

    /// Render parts in the structured layout.
    pub fn render(&self, parts: &SummaryParts) -> String {
        let mut blocks: Vec<String> = Vec::new();

        if !parts.keywords.is_empty() {
            blocks.push(format!("**Keywords:** {}", parts.keywords.join(", ")));
        }

        if let Some(abstract_text) = &parts.abstract_text {
            let excerpt = truncate_chars(abstract_text, self.options.abstract_chars);
            blocks.push(format!("**Abstract:** {excerpt}"));
        }

        if !parts.headers.is_empty() {
            let mut block = String::from("**Sections:**");
            for header in &parts.headers {
                block.push_str("\n- ");
                block.push_str(header);
            }
            blocks.push(block);
        }

        if !parts.key_points.is_empty() {
            let mut block = String::from("**Key Points:**");
            for point in &parts.key_points {
                block.push_str("\n- ");
                block.push_str(&truncate_chars(point, self.options.key_point_chars));
            }
            blocks.push(block);
        }

        blocks.join("\n\n")
    }
}
