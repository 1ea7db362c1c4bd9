use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::filter::FileTypeFilter;
use crate::scoring::{literal_score, regex_score, Confidence};
use context_protocol::SearchPlan;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// What produced a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchSource {
    Term(String),
    Pattern(String),
}

impl MatchSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Term(term) => term,
            Self::Pattern(pattern) => pattern,
        }
    }
}

/// One located line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub file_path: String,

    /// 1-indexed
    pub line_number: usize,

    pub line_content: String,

    pub score: f32,

    pub confidence: Confidence,

    pub matched_by: MatchSource,

    #[serde(default)]
    pub context_before: Vec<String>,

    #[serde(default)]
    pub context_after: Vec<String>,
}

/// Ranking order: score descending, then earliest line, then path.
pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.line_number.cmp(&b.line_number))
        .then_with(|| a.file_path.cmp(&b.file_path))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchExecution {
    pub success: bool,
    pub results: Vec<SearchResult>,
    pub files_searched: usize,
    pub used_fallback: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs classifier search plans over in-memory file contents.
pub struct SearchExecutor {
    config: SearchConfig,
}

#[derive(Default)]
struct PassStats {
    usable_inputs: usize,
    invalid_patterns: Vec<String>,
}

impl SearchExecutor {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Execute `plan` against `files` (path -> content).
    ///
    /// The fallback terms/patterns run only when the primary pass finds
    /// nothing. An empty outcome is a normal result, not an error.
    pub fn execute<I, K, V>(&self, plan: &SearchPlan, files: I) -> SearchExecution
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut warnings = Vec::new();
        let filter = self.file_filter(plan, &mut warnings);

        let mut candidates: Vec<(String, String)> = files
            .into_iter()
            .filter(|(path, _)| filter.matches(path.as_ref()))
            .map(|(path, content)| (path.as_ref().to_string(), content.as_ref().to_string()))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        candidates.dedup_by(|a, b| a.0 == b.0);

        let mut stats = PassStats::default();
        let mut results = self.run_pass(
            &plan.search_terms,
            &plan.regex_patterns,
            &candidates,
            &mut stats,
        );

        let mut used_fallback = false;
        if results.is_empty() {
            if let Some(fallback) = &plan.fallback {
                log::debug!("Primary search found nothing; running fallback");
                used_fallback = true;
                results = self.run_pass(&fallback.terms, &fallback.patterns, &candidates, &mut stats);
            }
        }

        for pattern in &stats.invalid_patterns {
            warnings.push(format!("skipped invalid pattern: {pattern}"));
        }

        if !results.is_empty() && results.len() != usize::from(plan.expected_matches()) {
            log::debug!(
                "Plan expected {} match(es), found {}",
                plan.expected_matches(),
                results.len()
            );
        }

        results.sort_by(compare_results);
        results.truncate(self.config.max_results);

        let malformed = results.is_empty()
            && stats.usable_inputs == 0
            && !stats.invalid_patterns.is_empty();
        let error = malformed.then(|| {
            format!(
                "no usable search input: {} pattern(s) failed to compile",
                stats.invalid_patterns.len()
            )
        });

        log::info!(
            "Search plan ({}) searched {} file(s): {} result(s){}",
            plan.edit_type,
            candidates.len(),
            results.len(),
            if used_fallback { " via fallback" } else { "" }
        );

        SearchExecution {
            success: !malformed,
            results,
            files_searched: candidates.len(),
            used_fallback,
            warnings,
            error,
        }
    }

    fn file_filter(&self, plan: &SearchPlan, warnings: &mut Vec<String>) -> FileTypeFilter {
        let requested = plan.file_types.iter().any(|t| !t.trim().is_empty());
        if requested {
            match FileTypeFilter::new(&plan.file_types) {
                Ok(filter) => return filter,
                Err(err) => {
                    log::warn!("{err}; using default file types");
                    warnings.push(err.to_string());
                }
            }
        }
        FileTypeFilter::new(&self.config.default_file_types).unwrap_or_else(|err| {
            log::warn!("{err}; searching no files");
            warnings.push(err.to_string());
            FileTypeFilter::none()
        })
    }

    fn run_pass(
        &self,
        terms: &[String],
        patterns: &[String],
        files: &[(String, String)],
        stats: &mut PassStats,
    ) -> Vec<SearchResult> {
        let terms: Vec<&str> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        stats.usable_inputs += terms.len();

        let mut compiled: Vec<(&str, Regex)> = Vec::new();
        for pattern in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => compiled.push((pattern, regex)),
                Err(source) => {
                    let err = SearchError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    };
                    log::warn!("Skipping pattern: {err}");
                    stats.invalid_patterns.push(pattern.to_string());
                }
            }
        }
        stats.usable_inputs += compiled.len();

        let mut results = Vec::new();
        for (path, content) in files {
            let lines: Vec<&str> = content.lines().collect();
            for (idx, line) in lines.iter().enumerate() {
                for term in &terms {
                    if let Some(score) = literal_score(line, term) {
                        results.push(self.make_result(
                            path,
                            &lines,
                            idx,
                            score,
                            MatchSource::Term((*term).to_string()),
                        ));
                    }
                }
                for (pattern, regex) in &compiled {
                    let Some(found) = regex.find(line) else {
                        continue;
                    };
                    if found.as_str().trim().is_empty() {
                        continue;
                    }
                    let score = regex_score(line, found.as_str());
                    results.push(self.make_result(
                        path,
                        &lines,
                        idx,
                        score,
                        MatchSource::Pattern((*pattern).to_string()),
                    ));
                }
            }
        }
        results
    }

    fn make_result(
        &self,
        path: &str,
        lines: &[&str],
        idx: usize,
        score: f32,
        matched_by: MatchSource,
    ) -> SearchResult {
        let before_start = idx.saturating_sub(self.config.context_lines);
        let after_end = (idx + 1 + self.config.context_lines).min(lines.len());
        SearchResult {
            file_path: path.to_string(),
            line_number: idx + 1,
            line_content: lines[idx].trim_end().to_string(),
            score,
            confidence: Confidence::from_score(score),
            matched_by,
            context_before: lines[before_start..idx].iter().map(|l| l.to_string()).collect(),
            context_after: lines[idx + 1..after_end].iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl Default for SearchExecutor {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// One-shot execution with the default configuration.
pub fn execute_search_plan<I, K, V>(plan: &SearchPlan, files: I) -> SearchExecution
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    SearchExecutor::default().execute(plan, files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_protocol::{EditCategory, SearchFallback};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn files() -> BTreeMap<String, String> {
        let mut files = BTreeMap::new();
        files.insert(
            "src/components/Hero.jsx".to_string(),
            [
                "export default function Hero() {",
                "  return (",
                "    <section className=\"hero\">",
                "      <button>Start Deploying</button>",
                "    </section>",
                "  );",
                "}",
            ]
            .join("\n"),
        );
        files.insert(
            "src/index.css".to_string(),
            ".hero { color: red; }\nStart Deploying".to_string(),
        );
        files
    }

    #[test]
    fn literal_term_locates_line() {
        let plan = SearchPlan::new(EditCategory::UpdateComponent).with_terms(["Start Deploying"]);
        let outcome = execute_search_plan(&plan, &files());

        assert!(outcome.success);
        assert_eq!(outcome.files_searched, 1, "css is outside default file types");
        assert_eq!(outcome.results.len(), 1);
        let hit = &outcome.results[0];
        assert_eq!(hit.file_path, "src/components/Hero.jsx");
        assert_eq!(hit.line_number, 4);
        assert_eq!(hit.line_content, "      <button>Start Deploying</button>");
        assert_eq!(hit.matched_by, MatchSource::Term("Start Deploying".to_string()));
        assert_eq!(hit.context_before.len(), 3);
        assert_eq!(hit.context_after.len(), 3);
    }

    #[test]
    fn search_is_case_insensitive() {
        let plan = SearchPlan::new(EditCategory::UpdateComponent).with_terms(["start deploying"]);
        let outcome = execute_search_plan(&plan, &files());
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn empty_plan_without_fallback_succeeds_empty() {
        let plan = SearchPlan::new(EditCategory::FixIssue);
        let outcome = execute_search_plan(&plan, &files());
        assert!(outcome.success);
        assert!(outcome.results.is_empty());
        assert!(!outcome.used_fallback);
    }

    #[test]
    fn fallback_runs_only_when_primary_is_empty() {
        let plan = SearchPlan::new(EditCategory::UpdateStyle)
            .with_terms(["bg-purple-900"])
            .with_fallback(SearchFallback {
                terms: vec!["className=\"hero\"".to_string()],
                patterns: vec![],
            });
        let outcome = execute_search_plan(&plan, &files());
        assert!(outcome.used_fallback);
        assert_eq!(outcome.results[0].line_number, 3);

        let plan = SearchPlan::new(EditCategory::UpdateStyle)
            .with_terms(["button"])
            .with_fallback(SearchFallback {
                terms: vec!["section".to_string()],
                patterns: vec![],
            });
        let outcome = execute_search_plan(&plan, &files());
        assert!(!outcome.used_fallback);
        assert!(outcome.results.iter().all(|r| r.line_number == 4));
    }

    #[test]
    fn regex_patterns_match_per_line() {
        let plan =
            SearchPlan::new(EditCategory::FixIssue).with_patterns([r"<button>.*</button>"]);
        let outcome = execute_search_plan(&plan, &files());
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(
            outcome.results[0].matched_by,
            MatchSource::Pattern(r"<button>.*</button>".to_string())
        );
    }

    #[test]
    fn invalid_patterns_are_skipped_with_warning() {
        let plan = SearchPlan::new(EditCategory::FixIssue)
            .with_terms(["Hero"])
            .with_patterns(["(unclosed"]);
        let outcome = execute_search_plan(&plan, &files());
        assert!(outcome.success);
        assert!(!outcome.results.is_empty());
        assert_eq!(outcome.warnings, vec!["skipped invalid pattern: (unclosed"]);
    }

    #[test]
    fn only_invalid_patterns_is_a_malformed_plan() {
        let plan = SearchPlan::new(EditCategory::FixIssue).with_patterns(["(unclosed"]);
        let outcome = execute_search_plan(&plan, &files());
        assert!(!outcome.success);
        assert!(outcome.results.is_empty());
        assert!(outcome.error.is_some());
    }

    #[test]
    fn plan_file_types_override_defaults() {
        let mut plan = SearchPlan::new(EditCategory::UpdateStyle).with_terms(["Start Deploying"]);
        plan.file_types = vec![".css".to_string()];
        let outcome = execute_search_plan(&plan, &files());
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].file_path, "src/index.css");
        assert_eq!(outcome.results[0].score, crate::scoring::EXACT_LINE_SCORE);
    }

    #[test]
    fn results_are_ranked() {
        let mut contents = BTreeMap::new();
        contents.insert("b.jsx", "<p>Pricing plans</p>\nPricing");
        contents.insert("a.jsx", "x\ny\n<h2>Pricing</h2>");
        let plan = SearchPlan::new(EditCategory::UpdateComponent).with_terms(["pricing"]);
        let outcome = execute_search_plan(&plan, contents);

        let order: Vec<(&str, usize)> = outcome
            .results
            .iter()
            .map(|r| (r.file_path.as_str(), r.line_number))
            .collect();
        assert_eq!(order[0], ("b.jsx", 2));
        assert_eq!(order.len(), 3);
    }
}
