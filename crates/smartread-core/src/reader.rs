//! Document reader — the three operations exposed to the request layer.
//!
//! [`DocumentReader`] holds only immutable options and a shared token
//! counter, so one instance can serve any number of threads. It never touches
//! the file system; callers hand it the document text.

use std::sync::Arc;

use tracing::{debug, instrument};

use smartread_config::AppConfig;

use crate::document::{SectionIndex, SummaryComposer, SummaryOptions, SummaryStyle};
use crate::policy::{
    Confidence, Coverage, DEFAULT_TOKEN_THRESHOLD, OutputKind, ReadMode, UnknownMode, decide,
    reduction_factor,
};
use crate::tokenizer::{Encoding, TokenCounter, TokenizerError, counter_for};
use crate::tools::ToolRequest;
use crate::types::{
    FullRead, ReadResponse, SectionContent, SectionList, SectionMissing, SectionResponse,
    SectionsInfo, SummaryRead,
};

/// Note attached to the heading overview of a summary.
const SECTIONS_NOTE: &str = "Use list_sections() for the complete list";

/// Errors from building a reader or interpreting a request.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),

    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reader behaviour, usually derived from [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// `auto` mode summarizes documents above this many tokens.
    pub token_threshold: usize,
    /// Mode used when a request names none.
    pub default_mode: ReadMode,
    /// Style used when a request names none.
    pub default_style: SummaryStyle,
    /// Headers echoed in summary metadata.
    pub metadata_headers: usize,
    /// Summary composition limits.
    pub summary: SummaryOptions,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            token_threshold: DEFAULT_TOKEN_THRESHOLD,
            default_mode: ReadMode::Auto,
            default_style: SummaryStyle::Structured,
            metadata_headers: 20,
            summary: SummaryOptions::default(),
        }
    }
}

impl TryFrom<&AppConfig> for ReaderOptions {
    type Error = ReaderError;

    fn try_from(config: &AppConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            token_threshold: config.reader.token_threshold,
            default_mode: config.reader.default_mode.parse()?,
            default_style: SummaryStyle::parse(&config.reader.default_style),
            metadata_headers: config.summary.metadata_headers,
            summary: SummaryOptions::from(&config.summary),
        })
    }
}

/// Token-budgeted access to one document at a time.
#[derive(Clone)]
pub struct DocumentReader {
    counter: Arc<dyn TokenCounter>,
    options: ReaderOptions,
    composer: SummaryComposer,
}

impl std::fmt::Debug for DocumentReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentReader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DocumentReader {
    /// Create a reader around an injected token counter.
    pub fn new(counter: Arc<dyn TokenCounter>, options: ReaderOptions) -> Self {
        let composer = SummaryComposer::new(options.summary.clone());
        Self {
            counter,
            options,
            composer,
        }
    }

    /// Build a reader from configuration, loading the configured encoder.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReaderError> {
        let encoding: Encoding = config.tokenizer.encoding.parse()?;
        let counter = counter_for(encoding)?;
        Ok(Self::new(counter, ReaderOptions::try_from(config)?))
    }

    /// The options this reader applies.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Count tokens with the injected counter.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    /// Read with the configured default mode and style.
    pub fn read_default(&self, text: &str) -> ReadResponse {
        self.read(text, self.options.default_mode, &self.options.default_style)
    }

    /// Return the full text or a summary, as the read policy decides.
    #[instrument(level = "debug", skip_all, fields(%mode, %style, bytes = text.len()))]
    pub fn read(&self, text: &str, mode: ReadMode, style: &SummaryStyle) -> ReadResponse {
        let original_tokens = self.counter.count(text);
        let decision = decide(mode, original_tokens, self.options.token_threshold, style.clone());
        debug!(
            original_tokens,
            threshold = self.options.token_threshold,
            kind = ?decision.kind,
            "Read policy decided"
        );

        if decision.kind == OutputKind::Full {
            return ReadResponse::Full(FullRead {
                content: text.to_string(),
                tokens: original_tokens,
            });
        }

        let summary = self
            .composer
            .compose(text, &decision.style, self.counter.as_ref());
        let summary_tokens = self.counter.count(&summary.text);
        let index = SectionIndex::new(text);
        let mut headers = index.titles();
        headers.truncate(self.options.metadata_headers);

        debug!(summary_tokens, fallback = summary.fallback, "Summary composed");

        ReadResponse::Summary(SummaryRead {
            style: decision.style.to_string(),
            original_tokens,
            summary_tokens,
            reduction_factor: reduction_factor(original_tokens, summary_tokens),
            sections: SectionsInfo {
                count: index.len(),
                headers,
                note: SECTIONS_NOTE.to_string(),
            },
            coverage: Coverage::of(&summary.parts, original_tokens, summary_tokens),
            confidence: Confidence::new(original_tokens, summary_tokens),
            content: summary.text,
        })
    }

    /// Return the first section whose heading contains `query`.
    #[instrument(level = "debug", skip(self, text), fields(bytes = text.len()))]
    pub fn extract_section(&self, text: &str, query: &str) -> SectionResponse {
        match SectionIndex::new(text).find(query) {
            Ok(section) => SectionResponse::Found(SectionContent {
                tokens: self.counter.count(&section.content),
                heading: section.heading.title,
                heading_level: section.heading.level,
                start_line: section.start_line,
                end_line: section.end_line,
                content: section.content,
            }),
            Err(not_found) => {
                debug!("No heading matched");
                SectionResponse::NotFound(SectionMissing {
                    error: not_found.to_string(),
                    section: not_found.query,
                })
            }
        }
    }

    /// Every heading title in document order.
    pub fn list_sections(&self, text: &str) -> SectionList {
        let sections = SectionIndex::new(text).titles();
        SectionList {
            count: sections.len(),
            sections,
        }
    }

    /// Answer a tool call against `text`, the contents of its `file_path`.
    pub fn call(
        &self,
        request: &ToolRequest,
        text: &str,
    ) -> Result<serde_json::Value, ReaderError> {
        let value = match request {
            ToolRequest::SmartRead {
                mode,
                summary_style,
                ..
            } => {
                let mode = mode.unwrap_or(self.options.default_mode);
                let style = summary_style
                    .as_deref()
                    .map(SummaryStyle::parse)
                    .unwrap_or_else(|| self.options.default_style.clone());
                serde_json::to_value(self.read(text, mode, &style))?
            }
            ToolRequest::ReadSection {
                section_heading, ..
            } => serde_json::to_value(self.extract_section(text, section_heading))?,
            ToolRequest::ListSections { .. } => serde_json::to_value(self.list_sections(text))?,
        };
        Ok(value)
    }
}
