//! Document engine — section indexing, content extraction and summaries.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Document Engine                │
//! │                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌──────────┐  │
//! │  │ Section   │  │ Content   │  │ Summary  │  │
//! │  │ Indexer   │─▶│ Extractor │─▶│ Composer │  │
//! │  │           │  │           │  │          │  │
//! │  │ ·headings │  │ ·abstract │  │ ·layout  │  │
//! │  │ ·spans    │  │ ·keywords │  │ ·excerpt │  │
//! │  │ ·lookup   │  │ ·ranking  │  │ ·budget  │  │
//! │  └───────────┘  └───────────┘  └──────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of the document text. Nothing is
//! cached between calls.

pub mod extract;
pub mod sections;
pub mod summary;

pub use extract::{
    HeuristicScorer, ScoredSentence, SentenceScorer, extract_abstract, extract_key_points,
    extract_keywords, split_sentences,
};
pub use sections::{
    HeadingDescriptor, Section, SectionIndex, SectionNotFound, find_section, index,
};
pub use summary::{Summary, SummaryComposer, SummaryOptions, SummaryParts, SummaryStyle};
