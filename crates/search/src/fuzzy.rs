use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

/// Fuzzy matching of request text against component names using nucleo-matcher
pub struct FuzzySearch {
    matcher: Matcher,
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl FuzzySearch {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Rank `names` by fuzzy similarity to `query`.
    /// Returns (name_index, score) sorted by score descending, scores
    /// normalized against the best hit.
    pub fn rank<S: AsRef<str>>(&mut self, query: &str, names: &[S], limit: usize) -> Vec<(usize, f32)> {
        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut scored: Vec<(usize, u32)> = names
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                let haystack = Utf32String::from(name.as_ref());
                pattern
                    .score(haystack.slice(..), &mut self.matcher)
                    .map(|score| (idx, score))
            })
            .collect();

        // Sort by score descending, then by position for stability
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(limit);

        let max_score = scored.first().map(|(_, s)| *s as f32).unwrap_or(1.0);

        scored
            .into_iter()
            .map(|(idx, score)| {
                let normalized = if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                };
                (idx, normalized)
            })
            .collect()
    }

    /// Indices of `names` mentioned as a word in `text`.
    ///
    /// A name counts as mentioned when it equals (case-insensitively) a word,
    /// a word without its plural `s`, or two adjacent words joined
    /// (`nav bar` mentions `NavBar`). Order follows `names`.
    pub fn mentioned<S: AsRef<str>>(&mut self, text: &str, names: &[S]) -> Vec<usize> {
        let words = words(text);
        let mut candidates: Vec<Utf32String> = Vec::new();
        for (i, word) in words.iter().enumerate() {
            candidates.push(Utf32String::from(word.as_str()));
            if let Some(singular) = word.strip_suffix('s').filter(|s| !s.is_empty()) {
                candidates.push(Utf32String::from(singular));
            }
            if let Some(next) = words.get(i + 1) {
                candidates.push(Utf32String::from(format!("{word}{next}")));
            }
        }

        names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_ref().chars().count() >= 2)
            .filter_map(|(idx, name)| {
                let pattern = Pattern::new(
                    name.as_ref(),
                    CaseMatching::Ignore,
                    Normalization::Smart,
                    AtomKind::Exact,
                );
                candidates
                    .iter()
                    .any(|candidate| pattern.score(candidate.slice(..), &mut self.matcher).is_some())
                    .then_some(idx)
            })
            .collect()
    }
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 4] = ["Header", "Footer", "HeroSection", "NavBar"];

    #[test]
    fn test_fuzzy_rank_prefers_closest_name() {
        let mut fuzzy = FuzzySearch::new();
        let results = fuzzy.rank("head", &NAMES, 5);

        assert!(!results.is_empty());
        assert_eq!(results[0], (0, 1.0));
    }

    #[test]
    fn test_fuzzy_rank_tolerates_gaps() {
        let mut fuzzy = FuzzySearch::new();
        let results = fuzzy.rank("hdr", &NAMES, 5);
        assert!(results.iter().any(|(idx, _)| *idx == 0));
    }

    #[test]
    fn test_mentioned_words() {
        let mut fuzzy = FuzzySearch::new();
        assert_eq!(fuzzy.mentioned("Make the header blue", &NAMES), vec![0]);
        assert_eq!(fuzzy.mentioned("fix both footers", &NAMES), vec![1]);
        assert_eq!(fuzzy.mentioned("the nav bar overlaps", &NAMES), vec![3]);
        assert!(fuzzy.mentioned("add a pricing page", &NAMES).is_empty());
    }

    #[test]
    fn test_mentioned_requires_whole_word() {
        let mut fuzzy = FuzzySearch::new();
        assert!(fuzzy.mentioned("apply changes", &["App"]).is_empty());
        assert_eq!(fuzzy.mentioned("in the App component", &["App"]), vec![0]);
    }
}
