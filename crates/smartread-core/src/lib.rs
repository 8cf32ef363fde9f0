#![deny(unsafe_code)]

//! SmartRead core — token-budgeted access to large documents.
//!
//! A caller asks for a document and gets back either the full text or a
//! compact structured summary, decided by a token threshold. Sections can be
//! pulled out individually by a heading fragment, and the heading list serves
//! as a table of contents. All operations are pure functions of the text
//! handed in; file access belongs to the caller.

/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Section indexing, content extraction and summary composition.
pub mod document;
/// Full-versus-summary policy, coverage and confidence metadata.
pub mod policy;
/// The reader facade over the three operations.
pub mod reader;
/// Token counting backends.
pub mod tokenizer;
/// MCP-style tool catalogue and typed tool calls.
pub mod tools;
/// Serializable responses.
pub mod types;

pub use document::{Section, SectionIndex, SummaryComposer, SummaryOptions, SummaryStyle};
pub use policy::{ReadMode, format_preamble};
pub use reader::{DocumentReader, ReaderError, ReaderOptions};
pub use tokenizer::{Encoding, HeuristicCounter, TokenCounter, counter_for};
pub use tools::{ToolError, ToolRegistry, ToolRequest};
pub use types::{ReadResponse, SectionList, SectionResponse};
