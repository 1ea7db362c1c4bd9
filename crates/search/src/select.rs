use crate::executor::{compare_results, SearchResult};
use context_protocol::EditCategory;
use std::collections::BTreeMap;

/// Results grouped per file, files in lexical order, each group ranked.
pub fn group_by_file(results: &[SearchResult]) -> BTreeMap<&str, Vec<&SearchResult>> {
    let mut groups: BTreeMap<&str, Vec<&SearchResult>> = BTreeMap::new();
    for result in results {
        groups.entry(result.file_path.as_str()).or_default().push(result);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| compare_results(a, b));
    }
    groups
}

/// Pick the single surgical edit location.
///
/// Only single-point categories select a target; broad categories return
/// `None` so the caller falls back to whole-file selection. `None` is also
/// the answer for an empty result set.
pub fn select_target_file(results: &[SearchResult], category: EditCategory) -> Option<&SearchResult> {
    if !category.is_single_point() {
        log::debug!("{category} is not a single-point edit; no target selected");
        return None;
    }
    group_by_file(results)
        .into_values()
        .filter_map(|group| group.into_iter().next())
        .min_by(|a, b| compare_results(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::MatchSource;
    use crate::scoring::Confidence;

    fn result(path: &str, line: usize, score: f32) -> SearchResult {
        SearchResult {
            file_path: path.to_string(),
            line_number: line,
            line_content: String::new(),
            score,
            confidence: Confidence::from_score(score),
            matched_by: MatchSource::Term("x".to_string()),
            context_before: Vec::new(),
            context_after: Vec::new(),
        }
    }

    #[test]
    fn highest_score_wins() {
        let results = vec![result("a.jsx", 1, 0.6), result("b.jsx", 9, 1.0)];
        let target = select_target_file(&results, EditCategory::UpdateStyle).unwrap();
        assert_eq!(target.file_path, "b.jsx");
    }

    #[test]
    fn equal_scores_prefer_earlier_line_then_smaller_path() {
        let results = vec![
            result("src/b.jsx", 3, 0.7),
            result("src/a.jsx", 3, 0.7),
            result("src/c.jsx", 2, 0.7),
        ];
        let target = select_target_file(&results, EditCategory::FixIssue).unwrap();
        assert_eq!((target.file_path.as_str(), target.line_number), ("src/c.jsx", 2));

        let results = vec![result("src/b.jsx", 3, 0.7), result("src/a.jsx", 3, 0.7)];
        let target = select_target_file(&results, EditCategory::RemoveElement).unwrap();
        assert_eq!(target.file_path, "src/a.jsx");
    }

    #[test]
    fn broad_categories_select_nothing() {
        let results = vec![result("a.jsx", 1, 1.0)];
        for category in [
            EditCategory::AddFeature,
            EditCategory::Refactor,
            EditCategory::FullRebuild,
            EditCategory::AddDependency,
        ] {
            assert!(select_target_file(&results, category).is_none(), "{category}");
        }
    }

    #[test]
    fn empty_results_select_nothing() {
        assert!(select_target_file(&[], EditCategory::UpdateComponent).is_none());
    }

    #[test]
    fn groups_are_ranked_per_file() {
        let results = vec![
            result("b.jsx", 5, 0.6),
            result("a.jsx", 2, 0.6),
            result("b.jsx", 1, 0.9),
        ];
        let groups = group_by_file(&results);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["a.jsx", "b.jsx"]);
        assert_eq!(groups["b.jsx"][0].line_number, 1);
    }
}
