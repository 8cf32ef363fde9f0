//! End-to-end reader behaviour over realistic documents.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use smartread_core::document::SummaryStyle;
use smartread_core::policy::ReadMode;
use smartread_core::types::{ReadResponse, SectionResponse, SummaryRead};
use smartread_core::{DocumentReader, HeuristicCounter, ReaderOptions, ToolRequest};
use smartread_test_utils::config::TestConfigBuilder;
use smartread_test_utils::fixtures::{
    SAMPLE_PAPER, SAMPLE_PAPER_HEADINGS, fixed_counter, large_document,
};

fn heuristic_reader() -> DocumentReader {
    DocumentReader::new(Arc::new(HeuristicCounter), ReaderOptions::default())
}

fn expect_summary(response: ReadResponse) -> SummaryRead {
    match response {
        ReadResponse::Summary(summary) => summary,
        ReadResponse::Full(_) => panic!("expected a summary, got the full text"),
    }
}

// ── Read ──────────────────────────────────────────────────────────

#[test_log::test]
fn test_large_paper_is_summarized_in_auto_mode() {
    let doc = large_document(10);
    let reader = DocumentReader::new(fixed_counter(&doc, 53_132, 797), ReaderOptions::default());

    let summary = expect_summary(reader.read(&doc, ReadMode::Auto, &SummaryStyle::Structured));
    assert_eq!(summary.original_tokens, 53_132);
    assert_eq!(summary.summary_tokens, 797);
    assert_eq!(format!("{:.1}", summary.reduction_factor), "66.7");
    assert!((summary.coverage.completeness_score - 0.015).abs() < 0.001);
    assert_eq!(summary.confidence.completeness, summary.coverage.completeness_score);
    assert_eq!(summary.sections.note, "Use list_sections() for the complete list");
}

#[test]
fn test_threshold_boundary() {
    let doc = "# Title\n\nSome text that is long enough to be a sentence.";
    let at = DocumentReader::new(fixed_counter(doc, 10_000, 5), ReaderOptions::default());
    let above = DocumentReader::new(fixed_counter(doc, 10_001, 5), ReaderOptions::default());

    assert!(!at.read_default(doc).is_summary());
    assert!(above.read_default(doc).is_summary());
}

#[test]
fn test_full_mode_returns_text_verbatim() {
    let doc = large_document(200);
    let response = heuristic_reader().read(&doc, ReadMode::Full, &SummaryStyle::Structured);
    match response {
        ReadResponse::Full(full) => {
            assert_eq!(full.content, doc);
            assert!(full.tokens > 10_000);
        }
        ReadResponse::Summary(_) => panic!("full mode must never summarize"),
    }
}

#[test_log::test]
fn test_structured_summary_of_sample_paper() {
    let summary = expect_summary(heuristic_reader().read(
        SAMPLE_PAPER,
        ReadMode::Summary,
        &SummaryStyle::Structured,
    ));

    assert!(summary.content.starts_with("**Keywords:** agents, reflection, token budgets"));
    assert!(summary.content.contains(
        "**Abstract:** We present a reading tool that lets agents pause before loading large \
         documents.\nIt summarizes long files and retrieves sections on demand."
    ));
    assert!(summary.content.contains("**Sections:**\n- Structured Pauses for Language Agents"));
    assert!(summary.content.contains("- 2.2 Section Extraction"));
    assert!(!summary.content.contains("- 2.2.1 Edge Cases"));
    assert!(summary.content.contains("**Key Points:**"));
    assert!(summary.content.contains("- We present a reading tool"));
    assert!(!summary.content.contains("Too short"));

    assert_eq!(summary.sections.count, SAMPLE_PAPER_HEADINGS.len());
    assert_eq!(summary.sections.headers, SAMPLE_PAPER_HEADINGS.to_vec());

    let included = summary.coverage.included;
    assert!(included.abstract_text);
    assert!(included.keywords);
    assert!(included.section_headers);
    assert!(included.key_findings);
}

#[test]
fn test_summary_metadata_caps_headers() {
    let doc = large_document(200);
    let summary = expect_summary(heuristic_reader().read_default(&doc));

    assert!(summary.original_tokens > 10_000);
    assert_eq!(summary.sections.count, 202);
    assert_eq!(summary.sections.headers.len(), 20);
    assert!(summary.content.contains("- Section 13\n"));
    assert!(!summary.content.contains("- Section 14\n"));
    assert!(summary.reduction_factor > 1.0);
}

#[test]
fn test_ratios_are_reciprocal() {
    let doc = large_document(200);
    let summary = expect_summary(heuristic_reader().read_default(&doc));
    let product = summary.reduction_factor * summary.coverage.completeness_score;
    assert!((product - 1.0).abs() < 1e-9);
}

#[test]
fn test_unimplemented_style_falls_back_to_leading_text() {
    let doc = large_document(200);
    let summary = expect_summary(heuristic_reader().read(
        &doc,
        ReadMode::Summary,
        &SummaryStyle::parse("extractive"),
    ));

    let expected: String = doc.chars().take(1000).collect();
    assert_eq!(summary.content, expected);
    assert_eq!(summary.style, "extractive");
    assert!(!summary.coverage.included.abstract_text);
    assert!(!summary.coverage.included.key_findings);
}

#[test]
fn test_empty_document() {
    let reader = heuristic_reader();
    assert_eq!(reader.read_default("").content(), "");

    let summary = expect_summary(reader.read("", ReadMode::Summary, &SummaryStyle::Structured));
    assert_eq!(summary.content, "");
    assert_eq!(summary.summary_tokens, 0);
    assert_eq!(summary.reduction_factor, 0.0);
    assert_eq!(summary.coverage.completeness_score, 0.0);
    assert_eq!(summary.sections.count, 0);
}

#[test]
fn test_tiny_document_summary_can_grow() {
    let doc = "# Hi\n\nThis is one short sentence here.";
    let summary = expect_summary(heuristic_reader().read(
        doc,
        ReadMode::Summary,
        &SummaryStyle::Structured,
    ));

    assert!(summary.summary_tokens > summary.original_tokens);
    assert!(summary.reduction_factor < 1.0, "got {}", summary.reduction_factor);
    assert!(summary.reduction_factor > 0.0);
    assert!(summary.coverage.completeness_score > 1.0);
}

#[test]
fn test_reads_are_idempotent() {
    let doc = large_document(50);
    let reader = heuristic_reader();
    let first = reader.read(&doc, ReadMode::Summary, &SummaryStyle::Structured);
    let second = reader.read(&doc, ReadMode::Summary, &SummaryStyle::Structured);
    assert_eq!(first, second);
}

// ── Configuration ─────────────────────────────────────────────────

#[test]
fn test_reader_from_config_applies_threshold() {
    let config = TestConfigBuilder::new().token_threshold(100).build();
    let reader = DocumentReader::from_config(&config).unwrap();
    assert!(reader.read_default(SAMPLE_PAPER).is_summary());

    let config = TestConfigBuilder::new().token_threshold(100_000).build();
    let reader = DocumentReader::from_config(&config).unwrap();
    assert!(!reader.read_default(SAMPLE_PAPER).is_summary());
}

#[test]
fn test_summary_token_ceiling() {
    let config = TestConfigBuilder::new().max_summary_tokens(150).build();
    let reader = DocumentReader::from_config(&config).unwrap();
    let doc = large_document(200);

    let summary = expect_summary(reader.read_default(&doc));
    assert!(summary.summary_tokens <= 150, "got {}", summary.summary_tokens);
    assert!(summary.content.starts_with("**Keywords:** scale, summaries"));
}

#[test]
fn test_configured_default_style() {
    let config = TestConfigBuilder::new()
        .default_mode("summary")
        .default_style("abstract")
        .build();
    let reader = DocumentReader::from_config(&config).unwrap();

    let summary = expect_summary(reader.read_default(SAMPLE_PAPER));
    assert_eq!(summary.style, "abstract");
}

#[test]
fn test_configured_summary_limits() {
    let config = TestConfigBuilder::new()
        .default_mode("summary")
        .key_points(2)
        .max_headers(3)
        .build();
    let reader = DocumentReader::from_config(&config).unwrap();

    let summary = expect_summary(reader.read_default(SAMPLE_PAPER));
    let list_lines = summary
        .content
        .lines()
        .filter(|line| line.starts_with("- "))
        .count();
    assert_eq!(list_lines, 5);
    assert!(summary.content.contains("- 1. Introduction\n\n**Key Points:**"));
}

#[test]
fn test_config_names_in_any_case() {
    let config = smartread_config::AppConfig::parse(
        "[reader]\ndefault_mode = \"SUMMARY\"\n\n[tokenizer]\nencoding = \"Heuristic\"\n",
    )
    .unwrap();
    let reader = DocumentReader::from_config(&config).unwrap();
    assert!(reader.read_default(SAMPLE_PAPER).is_summary());
    assert_eq!(reader.count_tokens("hello world"), 3);
}

#[test]
fn test_bpe_encoding_from_config() {
    let config = TestConfigBuilder::new().encoding("cl100k_base").build();
    let reader = DocumentReader::from_config(&config).unwrap();
    assert_eq!(reader.count_tokens("hello world"), 2);
    assert_eq!(reader.count_tokens(""), 0);
}

// ── Sections ──────────────────────────────────────────────────────

#[test]
fn test_extract_subsection() {
    let response = heuristic_reader().extract_section(SAMPLE_PAPER, "2.1");
    let SectionResponse::Found(section) = response else {
        panic!("expected section 2.1");
    };
    assert_eq!(
        section.content,
        "### 2.1 Token Counting\n\n\
         Documents are measured with a byte pair encoder before any decision is made."
    );
    assert_eq!(section.heading, "2.1 Token Counting");
    assert_eq!(section.heading_level, 3);
    assert_eq!(section.start_line, 19);
    assert_eq!(section.end_line, 21);
}

#[test]
fn test_extract_section_includes_nested_sections() {
    let response = heuristic_reader().extract_section(SAMPLE_PAPER, "methods");
    let SectionResponse::Found(section) = response else {
        panic!("expected the methods section");
    };
    assert!(section.content.starts_with("## 2. Methods"));
    assert!(section.content.contains("### 2.2 Section Extraction"));
    assert!(section.content.contains("#### 2.2.1 Edge Cases"));
    assert!(!section.content.contains("## 3. Results"));
}

#[test]
fn test_extract_last_section_runs_to_end() {
    let response = heuristic_reader().extract_section(SAMPLE_PAPER, "REFERENCES");
    let SectionResponse::Found(section) = response else {
        panic!("expected the references section");
    };
    assert_eq!(
        section.content,
        "## References\n\n- Smith and Jones. Reading at scale. 2024."
    );
}

#[test]
fn test_extract_missing_section() {
    let response = heuristic_reader().extract_section(SAMPLE_PAPER, "Appendix Z");
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["type"], "error");
    assert_eq!(json["error"], "Section 'Appendix Z' not found");
    assert_eq!(json["section"], "Appendix Z");
}

#[test]
fn test_list_sections_matches_headings() {
    let list = heuristic_reader().list_sections(SAMPLE_PAPER);
    assert_eq!(list.sections, SAMPLE_PAPER_HEADINGS.to_vec());
    assert_eq!(list.count, SAMPLE_PAPER_HEADINGS.len());
}

#[test]
fn test_every_listed_section_is_extractable() {
    let reader = heuristic_reader();
    for heading in reader.list_sections(SAMPLE_PAPER).sections {
        let response = reader.extract_section(SAMPLE_PAPER, &heading);
        assert!(
            matches!(response, SectionResponse::Found(_)),
            "heading {heading:?} should resolve"
        );
    }
}

// ── Tool calls ────────────────────────────────────────────────────

#[test]
fn test_tool_call_round_trip() {
    let request = ToolRequest::parse(
        "read_section",
        serde_json::json!({ "file_path": "paper.md", "section_heading": "results" }),
    )
    .unwrap();
    let value = heuristic_reader().call(&request, SAMPLE_PAPER).unwrap();
    assert_eq!(value["type"], "section");
    assert_eq!(value["heading"], "3. Results");
}
