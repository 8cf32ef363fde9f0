#![deny(unsafe_code)]

//! Configuration loading and validation for smartread.
//!
//! Loads `smartread.toml` and validates it. Every field has a default, so an
//! empty file (or no file at all) yields a usable [`AppConfig`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Read modes accepted by `reader.default_mode`.
pub const READ_MODES: [&str; 3] = ["auto", "full", "summary"];

/// Token encodings accepted by `tokenizer.encoding`.
pub const ENCODINGS: [&str; 5] = [
    "cl100k_base",
    "o200k_base",
    "p50k_base",
    "r50k_base",
    "heuristic",
];

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Read-mode selection.
    #[serde(default)]
    pub reader: ReaderConfig,

    /// Token counting backend.
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Summary composition limits.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Controls when a read returns a summary instead of the full document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Documents above this many tokens are summarized in `auto` mode.
    #[serde(default = "default_token_threshold")]
    pub token_threshold: usize,

    /// Mode used when a request does not name one: "auto", "full" or "summary".
    #[serde(default = "default_mode")]
    pub default_mode: String,

    /// Summary style used when a request does not name one.
    #[serde(default = "default_style")]
    pub default_style: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            token_threshold: default_token_threshold(),
            default_mode: default_mode(),
            default_style: default_style(),
        }
    }
}

fn default_token_threshold() -> usize {
    10_000
}

fn default_mode() -> String {
    "auto".to_string()
}

fn default_style() -> String {
    "structured".to_string()
}

/// Token counting backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// BPE encoding name, or "heuristic" for the ~4 bytes/token estimate.
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
        }
    }
}

fn default_encoding() -> String {
    "cl100k_base".to_string()
}

/// Limits applied when composing a structured summary.
///
/// ## TOML Example
///
/// ```toml
/// [summary]
/// key_points = 5
/// abstract_chars = 300
/// max_summary_tokens = 1500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Maximum keywords on the keyword line (0 = all).
    #[serde(default)]
    pub max_keywords_shown: usize,

    /// Abstract excerpt length in characters before truncation.
    #[serde(default = "default_abstract_chars")]
    pub abstract_chars: usize,

    /// Maximum section headers listed in the summary body.
    #[serde(default = "default_max_headers")]
    pub max_headers: usize,

    /// Deepest heading level listed in the summary body.
    #[serde(default = "default_header_max_level")]
    pub header_max_level: u8,

    /// Number of key sentences selected.
    #[serde(default = "default_key_points")]
    pub key_points: usize,

    /// Key sentence length in characters before truncation.
    #[serde(default = "default_key_point_chars")]
    pub key_point_chars: usize,

    /// Characters of raw text returned when nothing could be extracted.
    #[serde(default = "default_fallback_chars")]
    pub fallback_chars: usize,

    /// Maximum headers echoed in response metadata.
    #[serde(default = "default_metadata_headers")]
    pub metadata_headers: usize,

    /// Token ceiling for the composed summary (0 = unbounded).
    #[serde(default)]
    pub max_summary_tokens: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_keywords_shown: 0,
            abstract_chars: default_abstract_chars(),
            max_headers: default_max_headers(),
            header_max_level: default_header_max_level(),
            key_points: default_key_points(),
            key_point_chars: default_key_point_chars(),
            fallback_chars: default_fallback_chars(),
            metadata_headers: default_metadata_headers(),
            max_summary_tokens: 0,
        }
    }
}

fn default_abstract_chars() -> usize {
    500
}

fn default_max_headers() -> usize {
    15
}

fn default_header_max_level() -> u8 {
    3
}

fn default_key_points() -> usize {
    8
}

fn default_key_point_chars() -> usize {
    200
}

fn default_fallback_chars() -> usize {
    1000
}

fn default_metadata_headers() -> usize {
    20
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        debug!(path = %path.display(), bytes = content.len(), "Loaded config file");
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reader.token_threshold == 0 {
            return Err(ConfigError::Validation(
                "reader.token_threshold must be non-zero".to_string(),
            ));
        }
        if !is_one_of(&self.reader.default_mode, &READ_MODES) {
            return Err(ConfigError::Validation(format!(
                "reader.default_mode must be one of {:?}, got {:?}",
                READ_MODES, self.reader.default_mode
            )));
        }
        if self.reader.default_style.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reader.default_style must not be empty".to_string(),
            ));
        }

        if !is_one_of(&self.tokenizer.encoding, &ENCODINGS) {
            return Err(ConfigError::Validation(format!(
                "tokenizer.encoding must be one of {:?}, got {:?}",
                ENCODINGS, self.tokenizer.encoding
            )));
        }

        let summary = &self.summary;
        if summary.key_points == 0 {
            return Err(ConfigError::Validation(
                "summary.key_points must be at least 1".to_string(),
            ));
        }
        if summary.max_headers == 0 {
            return Err(ConfigError::Validation(
                "summary.max_headers must be at least 1".to_string(),
            ));
        }
        if !(1..=6).contains(&summary.header_max_level) {
            return Err(ConfigError::Validation(format!(
                "summary.header_max_level must be in 1..=6, got {}",
                summary.header_max_level
            )));
        }
        if summary.abstract_chars == 0 || summary.key_point_chars == 0 {
            return Err(ConfigError::Validation(
                "summary.abstract_chars and summary.key_point_chars must be non-zero".to_string(),
            ));
        }
        if summary.fallback_chars == 0 {
            return Err(ConfigError::Validation(
                "summary.fallback_chars must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Names are matched the way the reader parses them: trimmed, any case.
fn is_one_of(value: &str, names: &[&str]) -> bool {
    let value = value.trim();
    names.iter().any(|name| name.eq_ignore_ascii_case(value))
}
