//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use smartread_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// Starts from the defaults with the `heuristic` encoding, so tests never
/// load BPE tables unless they ask for one.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .token_threshold(100)
///     .key_points(3)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.tokenizer.encoding = "heuristic".to_string();
        Self { config }
    }

    pub fn token_threshold(mut self, threshold: usize) -> Self {
        self.config.reader.token_threshold = threshold;
        self
    }

    pub fn default_mode(mut self, mode: &str) -> Self {
        self.config.reader.default_mode = mode.to_string();
        self
    }

    pub fn default_style(mut self, style: &str) -> Self {
        self.config.reader.default_style = style.to_string();
        self
    }

    pub fn encoding(mut self, encoding: &str) -> Self {
        self.config.tokenizer.encoding = encoding.to_string();
        self
    }

    pub fn key_points(mut self, n: usize) -> Self {
        self.config.summary.key_points = n;
        self
    }

    pub fn max_headers(mut self, n: usize) -> Self {
        self.config.summary.max_headers = n;
        self
    }

    pub fn max_summary_tokens(mut self, n: usize) -> Self {
        self.config.summary.max_summary_tokens = n;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
