//! Match-quality scores in `[0, 1]`.
//!
//! Exact full-line literal matches outrank every other match; literal
//! substrings and regex spans score by how much of the (trimmed) line they
//! cover.

use serde::{Deserialize, Serialize};

pub const EXACT_LINE_SCORE: f32 = 1.0;
const SUBSTRING_BASE: f32 = 0.5;
const SUBSTRING_SPAN_WEIGHT: f32 = 0.4;
const SUBSTRING_MAX: f32 = 0.9;
const REGEX_BASE: f32 = 0.4;
const REGEX_SPAN_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.85 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

fn coverage(span_chars: usize, line_chars: usize) -> f32 {
    if line_chars == 0 {
        return 0.0;
    }
    (span_chars as f32 / line_chars as f32).min(1.0)
}

/// Score a case-insensitive literal match of `term` on `line`, or `None`
/// when the term does not occur.
pub fn literal_score(line: &str, term: &str) -> Option<f32> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return None;
    }
    let line = line.trim().to_lowercase();
    if line == term {
        return Some(EXACT_LINE_SCORE);
    }
    if !line.contains(&term) {
        return None;
    }
    let ratio = coverage(term.chars().count(), line.chars().count());
    Some((SUBSTRING_BASE + SUBSTRING_SPAN_WEIGHT * ratio).min(SUBSTRING_MAX))
}

/// Score a regex match spanning `span` characters of `line`.
pub fn regex_score(line: &str, span: &str) -> f32 {
    let ratio = coverage(span.trim().chars().count(), line.trim().chars().count());
    REGEX_BASE + REGEX_SPAN_WEIGHT * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_line_beats_substring() {
        let exact = literal_score("   Start Deploying  ", "start deploying").unwrap();
        let partial = literal_score("<button>Start Deploying</button>", "Start Deploying").unwrap();
        assert_eq!(exact, EXACT_LINE_SCORE);
        assert!(partial < exact);
        assert!(partial > SUBSTRING_BASE);
    }

    #[test]
    fn missing_or_blank_term_has_no_score() {
        assert_eq!(literal_score("<div>hello</div>", "goodbye"), None);
        assert_eq!(literal_score("<div>hello</div>", "   "), None);
    }

    #[test]
    fn tighter_regex_scores_higher() {
        let tight = regex_score("bg-blue-500", "bg-blue-500");
        let loose = regex_score("<div className=\"p-4 bg-blue-500 text-white\">", "bg-blue-500");
        assert!(tight > loose);
        assert!(tight <= REGEX_BASE + REGEX_SPAN_WEIGHT);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(Confidence::from_score(1.0), Confidence::High);
        assert_eq!(Confidence::from_score(0.7), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.45), Confidence::Low);
    }

    proptest! {
        #[test]
        fn substring_scores_stay_below_exact(prefix in "[a-z <>]{1,20}", term in "[a-z]{3,12}") {
            let line = format!("{prefix}{term}");
            let score = literal_score(&line, &term).expect("term is on the line");
            if line.trim() != term {
                prop_assert!(score < EXACT_LINE_SCORE);
            }
            prop_assert!(score > 0.0);
        }
    }
}
