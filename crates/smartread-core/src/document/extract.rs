//! Content extraction — abstract, keywords and key sentences.
//!
//! Every extractor is total: a document without an abstract, keyword line
//! or usable prose yields `None` or an empty list, never an error.

use serde::{Deserialize, Serialize};

use super::sections::{SectionIndex, parse_heading_line};

/// Key sentences selected when the caller does not ask for a count.
pub const DEFAULT_KEY_POINTS: usize = 8;

/// Sentences shorter than this many words are never candidates.
const MIN_SENTENCE_WORDS: usize = 3;

const KEYWORD_LABELS: [&str; 2] = ["**keywords:**", "**keywords**:"];
const ABSTRACT_LABELS: [&str; 3] = ["**abstract:**", "**abstract**:", "abstract:"];

/// Phrases that usually introduce a paper's claims.
const INDICATOR_PHRASES: [&str; 13] = [
    "we present",
    "we propose",
    "we demonstrate",
    "we show",
    "our contributions",
    "in this paper",
    "this paper",
    "remarkably",
    "importantly",
    "significantly",
    "in summary",
    "we find",
    "results show",
];

/// Strip a case-insensitive ASCII `label` from the start of `line`.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.get(..label.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(label))
        .map(|_| &line[label.len()..])
}

/// `---`, `***` or `___` (optionally spaced) on a line of its own.
fn is_thematic_break(line: &str) -> bool {
    let marks: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3 && ['-', '*', '_'].iter().any(|m| marks.iter().all(|c| c == m))
}

/// Keywords from the first `**Keywords:**` line, in order, duplicates kept.
pub fn extract_keywords(text: &str) -> Vec<String> {
    for line in text.lines() {
        let line = line.trim_start();
        let Some(rest) = KEYWORD_LABELS
            .iter()
            .find_map(|label| strip_label(line, label))
        else {
            continue;
        };
        return rest
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
    }
    Vec::new()
}

/// The abstract, from an "Abstract" section or an inline `**Abstract:**`
/// paragraph.
///
/// A heading titled exactly "Abstract" wins over one that merely mentions it,
/// so a paper called "Abstract Syntax Trees" still finds its real abstract.
/// A heading-based abstract stops at the first thematic break so title-page
/// separators don't drag the introduction along.
pub fn extract_abstract(text: &str) -> Option<String> {
    let index = SectionIndex::new(text);
    let exact = index
        .headings()
        .iter()
        .position(|h| h.title.eq_ignore_ascii_case("abstract"));
    if let Some(section) = exact
        .or_else(|| index.position("abstract"))
        .and_then(|i| index.section(i))
    {
        let body = cut_at_thematic_break(section.body()).trim();
        if !body.is_empty() {
            return Some(body.to_string());
        }
    }
    inline_abstract(text)
}

fn cut_at_thematic_break(body: &str) -> &str {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if is_thematic_break(line) {
            return &body[..offset];
        }
        offset += line.len();
    }
    body
}

fn inline_abstract(text: &str) -> Option<String> {
    let mut lines = text.lines();
    let first = lines.by_ref().find_map(|line| {
        let line = line.trim_start();
        ABSTRACT_LABELS
            .iter()
            .find_map(|label| strip_label(line, label))
    })?;

    let mut paragraph = vec![first.trim()];
    paragraph.extend(
        lines
            .take_while(|line| !line.trim().is_empty())
            .map(str::trim),
    );
    let joined = paragraph.join("\n");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

/// Prose paragraphs of a document, whitespace-collapsed.
///
/// Headings, keyword lines, fenced code, table rows and thematic breaks are
/// dropped. Blank lines and list items start new paragraphs.
fn prose_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_fence = false;

    let mut flush = |current: &mut Vec<&str>| {
        if !current.is_empty() {
            let joined = current.join(" ");
            paragraphs.push(joined.split_whitespace().collect::<Vec<_>>().join(" "));
            current.clear();
        }
    };

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            flush(&mut current);
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty()
            || parse_heading_line(line).is_some()
            || trimmed.starts_with('|')
            || is_thematic_break(trimmed)
            || KEYWORD_LABELS.iter().any(|l| strip_label(trimmed, l).is_some())
        {
            flush(&mut current);
            continue;
        }

        let content = trimmed.trim_start_matches('>').trim_start();
        match strip_list_marker(content) {
            Some(item) => {
                flush(&mut current);
                current.push(item);
            }
            None => current.push(content),
        }
    }
    flush(&mut current);
    paragraphs
}

fn strip_list_marker(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(item) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(item.trim_start());
        }
    }
    None
}

/// Split a document's prose into sentences, in document order.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace, or at the end of
/// a paragraph. Fragments under three words are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for paragraph in prose_paragraphs(text) {
        let mut start = 0;
        let mut chars = paragraph.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            let at_boundary = matches!(c, '.' | '!' | '?')
                && chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                push_sentence(&mut sentences, &paragraph[start..end]);
                start = end;
            }
        }
        push_sentence(&mut sentences, &paragraph[start..]);
    }
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if candidate.split_whitespace().count() >= MIN_SENTENCE_WORDS {
        sentences.push(candidate.to_string());
    }
}

/// Scores a sentence for inclusion as a key point.
///
/// Only the relative order of scores matters: the top N are kept and then
/// restored to document order.
pub trait SentenceScorer: Send + Sync {
    /// Score `sentence`, the `position`-th sentence (0-indexed) of the document.
    fn score(&self, sentence: &str, position: usize, keywords: &[String]) -> f64;
}

/// Keyword, indicator-phrase, position and length weighting.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    /// Added per extracted keyword the sentence mentions.
    pub keyword_weight: f64,
    /// Added per indicator phrase ("we propose", "importantly", ...).
    pub indicator_weight: f64,
    /// Weight of the first sentence; later ones decay as `1 / (1 + pos / decay)`.
    pub position_weight: f64,
    /// Sentences after which the position weight has halved.
    pub position_decay: f64,
    /// Sentence lengths (chars) considered normal.
    pub length_band: (usize, usize),
    /// Added for a length inside the band.
    pub length_bonus: f64,
    /// Subtracted for a length outside the band.
    pub length_penalty: f64,
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self {
            keyword_weight: 2.0,
            indicator_weight: 2.0,
            position_weight: 1.0,
            position_decay: 10.0,
            length_band: (50, 300),
            length_bonus: 1.0,
            length_penalty: 0.5,
        }
    }
}

impl SentenceScorer for HeuristicScorer {
    fn score(&self, sentence: &str, position: usize, keywords: &[String]) -> f64 {
        let lower = sentence.to_lowercase();

        let keyword_hits = keywords
            .iter()
            .filter(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
            .count();
        let indicator_hits = INDICATOR_PHRASES
            .iter()
            .filter(|p| lower.contains(*p))
            .count();

        let position_score = self.position_weight / (1.0 + position as f64 / self.position_decay);

        let len = sentence.chars().count();
        let (lo, hi) = self.length_band;
        let length_score = if (lo..=hi).contains(&len) {
            self.length_bonus
        } else {
            -self.length_penalty
        };

        keyword_hits as f64 * self.keyword_weight
            + indicator_hits as f64 * self.indicator_weight
            + position_score
            + length_score
    }
}

/// A candidate sentence with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSentence {
    /// Sentence text.
    pub text: String,
    /// Position among the document's sentences (0-indexed).
    pub position: usize,
    /// Score assigned by the scorer.
    pub score: f64,
}

/// Score every sentence, highest first; ties go to the earlier sentence.
pub fn rank_sentences(
    text: &str,
    keywords: &[String],
    scorer: &dyn SentenceScorer,
) -> Vec<ScoredSentence> {
    let mut ranked: Vec<ScoredSentence> = split_sentences(text)
        .into_iter()
        .enumerate()
        .map(|(position, text)| {
            let score = scorer.score(&text, position, keywords);
            ScoredSentence {
                text,
                position,
                score,
            }
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.position.cmp(&b.position))
    });
    ranked
}

/// The `count` best sentences, in document order.
pub fn select_key_points(
    text: &str,
    count: usize,
    keywords: &[String],
    scorer: &dyn SentenceScorer,
) -> Vec<String> {
    let mut top = rank_sentences(text, keywords, scorer);
    top.truncate(count);
    top.sort_by_key(|s| s.position);
    top.into_iter().map(|s| s.text).collect()
}

/// Key sentences using the document's own keywords and [`HeuristicScorer`].
pub fn extract_key_points(text: &str, count: usize) -> Vec<String> {
    let keywords = extract_keywords(text);
    select_key_points(text, count, &keywords, &HeuristicScorer::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAPER: &str = "\
# A Study of Things

**Keywords:** executive function, protocols , , AI assistants

## Abstract

We present a protocol for pausing before acting.
It improves outcomes.

---

## 1. Introduction

Assistants act quickly. Importantly, we propose a pause that lets them reflect on their plan.
";

    #[test]
    fn test_extract_keywords() {
        assert_eq!(
            extract_keywords(PAPER),
            vec!["executive function", "protocols", "AI assistants"]
        );
    }

    #[test]
    fn test_extract_keywords_alternate_label_and_case() {
        let text = "intro\n  **KEYWORDS**: alpha, beta, alpha\n";
        assert_eq!(extract_keywords(text), vec!["alpha", "beta", "alpha"]);
    }

    #[test]
    fn test_extract_keywords_absent() {
        assert!(extract_keywords("Keywords: not bold").is_empty());
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn test_extract_keywords_requires_line_start() {
        assert!(extract_keywords("see **Keywords:** a, b").is_empty());
    }

    #[test]
    fn test_extract_abstract_from_section() {
        assert_eq!(
            extract_abstract(PAPER).unwrap(),
            "We present a protocol for pausing before acting.\nIt improves outcomes."
        );
    }

    #[test]
    fn test_extract_abstract_prefers_exact_heading() {
        let text = "# Abstract Syntax Trees in Practice\n\nIntro prose about compilers.\n\n\
                    ## Abstract\n\nWe present a tree walker.\n\n\
                    ## 1. Introduction\n\nBody text here.";
        assert_eq!(extract_abstract(text).unwrap(), "We present a tree walker.");
    }

    #[test]
    fn test_extract_abstract_falls_back_to_partial_title() {
        let text = "# Paper\n\n## Abstract and Scope\n\nShort scope note.\n\n## Body\n\nText.";
        assert_eq!(extract_abstract(text).unwrap(), "Short scope note.");
    }

    #[test]
    fn test_extract_abstract_inline_marker() {
        let text = "# Title\n\n**Abstract:** Short summary here.\nSecond line.\n\nBody text.";
        assert_eq!(
            extract_abstract(text).unwrap(),
            "Short summary here.\nSecond line."
        );
    }

    #[test]
    fn test_extract_abstract_absent() {
        assert_eq!(extract_abstract("# Intro\nNo summary here."), None);
        assert_eq!(extract_abstract(""), None);
    }

    #[test]
    fn test_empty_abstract_section_falls_back_to_inline() {
        let text = "## Abstract\n\n## Body\nAbstract: inline wins.";
        assert_eq!(extract_abstract(text).unwrap(), "inline wins.");
    }

    #[test]
    fn test_thematic_breaks() {
        assert!(is_thematic_break("---"));
        assert!(is_thematic_break(" * * * "));
        assert!(is_thematic_break("_____"));
        assert!(!is_thematic_break("--"));
        assert!(!is_thematic_break("-*-"));
    }

    #[test]
    fn test_split_sentences_skips_structure() {
        let text = "\
# Heading line is skipped
First sentence is here. Second one follows!
```
code. that. should. not. count.
```
| table | row with words |
- A list item with words

Is this a question? yes
";
        assert_eq!(
            split_sentences(text),
            vec![
                "First sentence is here.",
                "Second one follows!",
                "A list item with words",
                "Is this a question?",
            ]
        );
    }

    #[test]
    fn test_split_sentences_joins_wrapped_lines() {
        let text = "This sentence is\nwrapped across   lines. Done now ok.";
        assert_eq!(
            split_sentences(text),
            vec!["This sentence is wrapped across lines.", "Done now ok."]
        );
    }

    #[test]
    fn test_split_sentences_keeps_decimals_together() {
        let text = "The value rose to 3.5 percent overall.";
        assert_eq!(split_sentences(text), vec![text]);
    }

    #[test]
    fn test_scorer_prefers_keywords() {
        let scorer = HeuristicScorer::default();
        let keywords = vec!["protocol".to_string()];
        let with = scorer.score("The protocol works well in practice today.", 5, &keywords);
        let without = scorer.score("The weather works well in practice today.", 5, &keywords);
        assert!(with > without);
    }

    #[test]
    fn test_scorer_decays_with_position() {
        let scorer = HeuristicScorer::default();
        let s = "A perfectly ordinary sentence of a perfectly ordinary length.";
        assert!(scorer.score(s, 0, &[]) > scorer.score(s, 50, &[]));
    }

    #[test]
    fn test_scorer_penalises_length_outside_band() {
        let scorer = HeuristicScorer::default();
        let short = "Too short here.";
        let normal = "This sentence sits comfortably inside the normal length band.";
        let long = "word ".repeat(80);
        assert!(scorer.score(normal, 3, &[]) > scorer.score(short, 3, &[]));
        assert!(scorer.score(normal, 3, &[]) > scorer.score(&long, 3, &[]));
    }

    #[test]
    fn test_key_points_restored_to_document_order() {
        let text = "\
Plain opening words without much going on at all here.
Filler sentence number two that says nothing in particular really.
Importantly, we propose the central idea of the whole document here.
Another filler sentence that adds very little to anything at all.
We present the secondary finding, which matters quite a lot indeed.
";
        let points = extract_key_points(text, 2);
        assert_eq!(
            points,
            vec![
                "Importantly, we propose the central idea of the whole document here.",
                "We present the secondary finding, which matters quite a lot indeed.",
            ]
        );
    }

    #[test]
    fn test_key_points_ties_prefer_earlier() {
        struct Flat;
        impl SentenceScorer for Flat {
            fn score(&self, _: &str, _: usize, _: &[String]) -> f64 {
                1.0
            }
        }
        let text = "One two three. Four five six. Seven eight nine.";
        let points = select_key_points(text, 2, &[], &Flat);
        assert_eq!(points, vec!["One two three.", "Four five six."]);
    }

    #[test]
    fn test_key_points_count_bounds() {
        assert!(extract_key_points(PAPER, 0).is_empty());
        assert!(extract_key_points(PAPER, 100).len() <= split_sentences(PAPER).len());
        assert!(extract_key_points("", DEFAULT_KEY_POINTS).is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(extract_key_points(PAPER, 3), extract_key_points(PAPER, 3));
        assert_eq!(extract_abstract(PAPER), extract_abstract(PAPER));
        assert_eq!(extract_keywords(PAPER), extract_keywords(PAPER));
    }
}
