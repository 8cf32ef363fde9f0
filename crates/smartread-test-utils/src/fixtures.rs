//! Sample documents and token counters.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use smartread_core::TokenCounter;
use tempfile::TempDir;

/// A short paper with keywords, an abstract, nested sections and prose.
///
/// Headings, in order: the title, `Abstract`, `1. Introduction`,
/// `2. Methods`, `2.1 Token Counting`, `2.2 Section Extraction`,
/// `2.2.1 Edge Cases` (level 4), `3. Results`, `References`.
pub const SAMPLE_PAPER: &str = "\
# Structured Pauses for Language Agents

**Keywords:** agents, reflection, token budgets

## Abstract

We present a reading tool that lets agents pause before loading large documents.
It summarizes long files and retrieves sections on demand.

---

## 1. Introduction

Agents often read entire files when a summary would suffice. In this paper we
study how much context a structured summary preserves. Too short.

## 2. Methods

### 2.1 Token Counting

Documents are measured with a byte pair encoder before any decision is made.

### 2.2 Section Extraction

Headings are scanned line by line and sections end at the next heading of equal or higher rank.

#### 2.2.1 Edge Cases

A heading needs a space after its hashes to count as a heading.

## 3. Results

Results show a large reduction in tokens for long papers. Importantly, the
section index stays exact.

## References

- Smith and Jones. Reading at scale. 2024.
";

/// Heading titles of [`SAMPLE_PAPER`], in order.
pub const SAMPLE_PAPER_HEADINGS: [&str; 9] = [
    "Structured Pauses for Language Agents",
    "Abstract",
    "1. Introduction",
    "2. Methods",
    "2.1 Token Counting",
    "2.2 Section Extraction",
    "2.2.1 Edge Cases",
    "3. Results",
    "References",
];

/// A generated paper with `sections` numbered level-2 sections.
///
/// Every section carries about 80 heuristic tokens of prose, so 200 sections
/// comfortably exceed the default threshold.
pub fn large_document(sections: usize) -> String {
    let mut doc = String::from(
        "# A Long Report\n\n\
         **Keywords:** scale, summaries\n\n\
         ## Abstract\n\n\
         This report exists to be too long to read in one go.\n\n",
    );
    for i in 1..=sections {
        let _ = write!(
            doc,
            "## Section {i}\n\n\
             Section {i} opens with a sentence that is long enough to rank as a candidate. \
             It continues with observations about measurement, structure and retrieval. \
             The closing sentence repeats the number {i} so sections stay distinguishable, \
             and pads the paragraph with ordinary words about documents and their readers.\n\n"
        );
    }
    doc
}

/// A counter that reports `original_tokens` for exactly `original` and
/// `other_tokens` for any other text.
pub fn fixed_counter(
    original: &str,
    original_tokens: usize,
    other_tokens: usize,
) -> Arc<dyn TokenCounter> {
    let original = original.to_string();
    Arc::new(move |text: &str| {
        if text == original {
            original_tokens
        } else {
            other_tokens
        }
    })
}

/// Write `content` to `name` inside a fresh temp directory.
///
/// The directory is deleted when the returned [`TempDir`] is dropped.
pub fn write_document(name: &str, content: impl AsRef<[u8]>) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("failed to write test document");
    (dir, path)
}
