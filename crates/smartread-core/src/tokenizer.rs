//! Token counting — the cost proxy behind every read-mode decision.
//!
//! Counting is expressed as the [`TokenCounter`] trait so the engine never
//! depends on a particular encoder. Two implementations ship here:
//!
//! - [`BpeCounter`] wraps a `tiktoken-rs` byte-pair encoder and gives exact
//!   counts for the chosen vocabulary.
//! - [`HeuristicCounter`] estimates ~4 bytes per token and needs no
//!   vocabulary data.
//!
//! Any `Fn(&str) -> usize` closure is also a counter, which keeps test doubles
//! to a single line.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Maps text to a token count.
///
/// Implementations must be pure: the same text always yields the same count,
/// and appending non-empty text never lowers it.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens in `text`.
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// Errors from building a token counter.
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    #[error("unknown token encoding: {0:?}")]
    UnknownEncoding(String),

    #[error("failed to load {encoding} encoder: {message}")]
    Load {
        encoding: &'static str,
        message: String,
    },
}

/// Supported token encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// GPT-3.5 / GPT-4 vocabulary.
    Cl100kBase,
    /// GPT-4o vocabulary.
    O200kBase,
    /// Codex-era vocabulary.
    P50kBase,
    /// GPT-3 vocabulary.
    R50kBase,
    /// Byte-length estimate, no vocabulary.
    Heuristic,
}

impl Encoding {
    /// The canonical configuration name of this encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::O200kBase => "o200k_base",
            Encoding::P50kBase => "p50k_base",
            Encoding::R50kBase => "r50k_base",
            Encoding::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cl100k_base" => Ok(Encoding::Cl100kBase),
            "o200k_base" => Ok(Encoding::O200kBase),
            "p50k_base" => Ok(Encoding::P50kBase),
            "r50k_base" => Ok(Encoding::R50kBase),
            "heuristic" => Ok(Encoding::Heuristic),
            _ => Err(TokenizerError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Exact counts from a `tiktoken-rs` byte-pair encoder.
pub struct BpeCounter {
    encoding: Encoding,
    bpe: CoreBPE,
}

impl BpeCounter {
    /// Load the vocabulary for `encoding`.
    ///
    /// [`Encoding::Heuristic`] has no vocabulary and is rejected here; use
    /// [`counter_for`] to get whichever counter an encoding name calls for.
    pub fn new(encoding: Encoding) -> Result<Self, TokenizerError> {
        let loaded = match encoding {
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
            Encoding::Heuristic => {
                return Err(TokenizerError::Load {
                    encoding: encoding.as_str(),
                    message: "heuristic counting has no BPE vocabulary".to_string(),
                });
            }
        };
        let bpe = loaded.map_err(|e| TokenizerError::Load {
            encoding: encoding.as_str(),
            message: e.to_string(),
        })?;
        debug!(%encoding, "Loaded BPE vocabulary");
        Ok(Self { encoding, bpe })
    }

    /// The encoding this counter was built for.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl fmt::Debug for BpeCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpeCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl TokenCounter for BpeCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        // Special-token markers in documents are counted as ordinary text.
        self.bpe.encode_ordinary(text).len()
    }
}

/// Rough estimate: one token per 4 bytes, rounded up.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }
}

/// Build the counter an encoding calls for.
pub fn counter_for(encoding: Encoding) -> Result<Arc<dyn TokenCounter>, TokenizerError> {
    match encoding {
        Encoding::Heuristic => Ok(Arc::new(HeuristicCounter)),
        other => Ok(Arc::new(BpeCounter::new(other)?)),
    }
}
