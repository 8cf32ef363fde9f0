//! Fuzz target for heading indexing and section extraction.
//!
//! Run with: cargo +nightly fuzz run fuzz_heading_scan
//!
//! The first byte picks where the query ends; the rest is the document.
//! Sections must never overlap, and a found section's heading must contain
//! the query.

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartread_core::SectionIndex;
use smartread_core::document::{extract_abstract, split_sentences};

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = (split as usize).min(rest.len());
    let query = String::from_utf8_lossy(&rest[..split]);
    let text = String::from_utf8_lossy(&rest[split..]);

    let index = SectionIndex::new(&text);
    let sections = index.sections();
    assert_eq!(sections.len(), index.len());
    for pair in index.headings().windows(2) {
        assert!(pair[0].start_offset < pair[1].start_offset);
    }
    for section in &sections {
        assert!(section.start_line <= section.end_line);
        assert!(text[section.heading.start_offset..].starts_with(&section.content));
    }

    if let Ok(section) = index.find(&query) {
        let title = section.heading.title.to_lowercase();
        assert!(title.contains(&query.to_lowercase()));
    }

    let _ = extract_abstract(&text);
    let _ = split_sentences(&text);
});
