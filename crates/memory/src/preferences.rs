//! Preferences inferred from the retained user messages.

use crate::types::{ConversationMessage, EditStyle, Role, UserPreferences};

const TARGETED_VERBS: &[&str] = &["update", "change", "fix", "modify", "edit", "remove", "delete"];
const COMPREHENSIVE_VERBS: &[&str] = &["rebuild", "recreate", "redesign", "overhaul", "refactor"];

/// Request pattern labels and the words that signal them, in tie-break order.
const PATTERN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "styling changes",
        &["color", "colour", "style", "css", "font", "background", "theme", "dark"],
    ),
    (
        "layout adjustments",
        &["layout", "spacing", "padding", "margin", "align", "center", "grid", "responsive"],
    ),
    ("new components", &["add", "new", "create", "section", "component"]),
    ("bug fixes", &["fix", "bug", "error", "broken", "issue", "crash"]),
    (
        "content updates",
        &["text", "title", "heading", "copy", "content", "wording", "label"],
    ),
    ("removals", &["remove", "delete", "hide"]),
    ("navigation", &["nav", "navbar", "menu", "link", "route", "page"]),
];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `word` is `stem` or one of its regular inflections.
fn is_inflection_of(word: &str, stem: &str) -> bool {
    if let Some(suffix) = word.strip_prefix(stem) {
        return matches!(suffix, "" | "s" | "es" | "d" | "ed" | "ing");
    }
    // create -> creating
    stem.strip_suffix('e')
        .and_then(|base| word.strip_prefix(base))
        .is_some_and(|suffix| suffix == "ing")
}

fn mentions_any(words: &[String], vocabulary: &[&str]) -> bool {
    words
        .iter()
        .any(|word| vocabulary.iter().any(|stem| is_inflection_of(word, stem)))
}

/// Majority vote; each message votes once per family, ties stay targeted.
pub fn infer_edit_style<'a>(requests: impl IntoIterator<Item = &'a str>) -> EditStyle {
    let mut targeted = 0usize;
    let mut comprehensive = 0usize;
    for request in requests {
        let words = words(request);
        if mentions_any(&words, TARGETED_VERBS) {
            targeted += 1;
        }
        if mentions_any(&words, COMPREHENSIVE_VERBS) {
            comprehensive += 1;
        }
    }
    if comprehensive > targeted {
        EditStyle::Comprehensive
    } else {
        EditStyle::Targeted
    }
}

/// Most frequent request patterns, at most `limit`.
pub fn infer_common_patterns<'a>(requests: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut counts = vec![0usize; PATTERN_KEYWORDS.len()];
    for request in requests {
        let words = words(request);
        for (slot, (_, keywords)) in counts.iter_mut().zip(PATTERN_KEYWORDS) {
            if mentions_any(&words, keywords) {
                *slot += 1;
            }
        }
    }

    let mut ranked: Vec<(usize, usize)> = counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .collect();
    // Stable sort keeps table order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(idx, _)| PATTERN_KEYWORDS[idx].0.to_string())
        .collect()
}

pub(crate) fn infer_preferences(messages: &[ConversationMessage], pattern_limit: usize) -> UserPreferences {
    let requests = || {
        messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    };
    UserPreferences {
        edit_style: infer_edit_style(requests()),
        common_patterns: infer_common_patterns(requests(), pattern_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn majority_decides_style() {
        assert_eq!(
            infer_edit_style(["Redesign the landing page", "Overhaul the footer", "change the title"]),
            EditStyle::Comprehensive
        );
        assert_eq!(
            infer_edit_style(["Update the header", "Rebuild everything"]),
            EditStyle::Targeted,
            "ties keep targeted"
        );
        assert_eq!(infer_edit_style(std::iter::empty()), EditStyle::Targeted);
    }

    #[test]
    fn inflected_verbs_count() {
        assert_eq!(
            infer_edit_style(["redesigned hero please", "refactoring time"]),
            EditStyle::Comprehensive
        );
    }

    #[test]
    fn unrelated_words_sharing_a_prefix_do_not_count() {
        for word in ["edition", "changer", "fixture", "updater"] {
            assert!(!mentions_any(&words(word), TARGETED_VERBS), "{word}");
        }
        for word in ["edits", "changed", "changing", "fixes", "removing"] {
            assert!(mentions_any(&words(word), TARGETED_VERBS), "{word}");
        }
        assert_eq!(infer_edit_style(["new edition of the page", "redesign it"]), EditStyle::Comprehensive);
    }

    #[test]
    fn patterns_rank_by_frequency_then_table_order() {
        let requests = [
            "Fix the broken menu",
            "Change the background color",
            "fix the error on submit",
            "make the font bigger",
        ];
        assert_eq!(
            infer_common_patterns(requests, 3),
            vec!["styling changes", "bug fixes", "navigation"]
        );
    }

    #[test]
    fn no_signal_means_no_patterns() {
        assert!(infer_common_patterns(["hello there"], 3).is_empty());
    }
}
