use crate::error::{PromptError, Result};
use context_graph::{ContextAssembler, ContextConfig};
use context_protocol::paths::{file_name, normalize_path};
use context_protocol::{EditCategory, EditIntent, Manifest, SearchFallback, SearchPlan};
use context_search::FuzzySearch;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::sync::Mutex;

/// What a classifier decided about a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Classification {
    Intent(EditIntent),
    Plan(SearchPlan),
}

const PLAN_KEYS: &[&str] = &[
    "edit_type",
    "editType",
    "search_terms",
    "searchTerms",
    "regex_patterns",
    "regexPatterns",
    "fallback",
    "fallbackSearch",
];

impl Classification {
    /// Accept either an edit intent or a search plan object.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(PromptError::UnusableClassification(
                "expected a JSON object".to_string(),
            ));
        };
        if PLAN_KEYS.iter().any(|key| object.contains_key(*key)) {
            serde_json::from_value(value)
                .map(Self::Plan)
                .map_err(|err| PromptError::UnusableClassification(format!("search plan: {err}")))
        } else {
            serde_json::from_value(value)
                .map(Self::Intent)
                .map_err(|err| PromptError::UnusableClassification(format!("edit intent: {err}")))
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(raw)?)
    }

    pub fn category(&self) -> EditCategory {
        match self {
            Self::Intent(intent) => intent.category,
            Self::Plan(plan) => plan.edit_type,
        }
    }
}

/// Turns a request into an edit intent or a search plan.
///
/// Implementations usually call out to a model; failures are returned to the
/// caller, which degrades to coarse file selection.
pub trait IntentClassifier {
    fn classify(&self, prompt: &str, manifest: &Manifest) -> anyhow::Result<Classification>;
}

impl<F> IntentClassifier for F
where
    F: Fn(&str, &Manifest) -> anyhow::Result<Classification>,
{
    fn classify(&self, prompt: &str, manifest: &Manifest) -> anyhow::Result<Classification> {
        self(prompt, manifest)
    }
}

fn keywords(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::error!("Built-in pattern failed to compile: {err}");
            None
        }
    }
}

const MIN_FUZZY_WORD: usize = 4;
const MAX_FUZZY_LENGTH_SPREAD: usize = 2;

/// Category rules in precedence order; the first match wins.
static CATEGORY_RULES: Lazy<Vec<(EditCategory, Regex)>> = Lazy::new(|| {
    let rules = [
        (
            EditCategory::FullRebuild,
            keywords(r"\b(rebuild|recreate|start over|from scratch|build (me )?a new (app|site|website))\b"),
        ),
        (
            EditCategory::AddDependency,
            keywords(r"\b(install|npm|yarn|pnpm|package|library|dependency|dependencies)\b"),
        ),
        (
            EditCategory::RemoveElement,
            keywords(r"\b(remove|delete|get rid of|take out)\b"),
        ),
        (
            EditCategory::FixIssue,
            keywords(r"\b(fix|bug|broken|error|not working|doesn'?t work|crash(es|ing)?)\b"),
        ),
        (
            EditCategory::UpdateStyle,
            keywords(
                r"\b(colou?rs?|background|font|styles?|styling|css|padding|margin|spacing|dark mode|theme|bold|rounded|shadow|gradient)\b|\b(bg|text|border)-[a-z]+-?\d*\b",
            ),
        ),
        (
            EditCategory::AddFeature,
            keywords(r"\b(add|create|new|implement|include|introduce)\b"),
        ),
        (
            EditCategory::Refactor,
            keywords(r"\b(refactor|restructure|reorgani[sz]e|clean up|split|extract)\b"),
        ),
    ];
    rules
        .into_iter()
        .filter_map(|(category, rule)| rule.map(|rule| (category, rule)))
        .collect()
});

static EXPLICIT_PATH: Lazy<Option<Regex>> =
    Lazy::new(|| keywords(r"[\w./-]+\.(jsx|tsx|js|ts|css|scss|json|html)\b"));

static QUOTED: Lazy<Option<Regex>> = Lazy::new(|| keywords(r#""([^"]+)"|'([^']{2,})'|“([^”]+)”"#));

static UTILITY_CLASS: Lazy<Option<Regex>> = Lazy::new(|| {
    keywords(r"\b(?:bg|text|border|rounded|shadow|font|p|px|py|m|mx|my|gap|w|h)-[a-z0-9]+(?:-[a-z0-9]+)*\b")
});

/// Local keyword classifier used when no model classifier is configured.
pub struct HeuristicClassifier {
    config: ContextConfig,
    fuzzy: Mutex<FuzzySearch>,
}

/// Targets found for a request and how they were found.
struct Targets {
    files: Vec<String>,
    explicit: bool,
    components: bool,
}

fn push_unique(files: &mut Vec<String>, path: &str) {
    if !files.iter().any(|known| known == path) {
        files.push(path.to_string());
    }
}

impl HeuristicClassifier {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            fuzzy: Mutex::new(FuzzySearch::new()),
        }
    }

    pub fn categorize(prompt: &str) -> EditCategory {
        CATEGORY_RULES
            .iter()
            .find(|(_, rule)| rule.is_match(prompt))
            .map(|(category, _)| *category)
            .unwrap_or(EditCategory::UpdateComponent)
    }

    /// Literal search terms in the request: quoted text and utility classes.
    pub fn search_terms(prompt: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for caps in QUOTED.iter().flat_map(|re| re.captures_iter(prompt)) {
            if let Some(text) = caps.iter().skip(1).flatten().next() {
                terms.push(text.as_str().trim().to_string());
            }
        }
        for found in UTILITY_CLASS.iter().flat_map(|re| re.find_iter(prompt)) {
            terms.push(found.as_str().to_string());
        }
        let mut seen = std::collections::HashSet::new();
        terms.retain(|term| !term.is_empty() && seen.insert(term.to_lowercase()));
        terms
    }

    fn mentioned_components(&self, prompt: &str, manifest: &Manifest) -> Vec<String> {
        let components = manifest.component_files();
        let names: Vec<&str> = components.keys().copied().collect();
        let mut fuzzy = match self.fuzzy.lock() {
            Ok(fuzzy) => fuzzy,
            Err(_) => {
                log::warn!("Fuzzy matcher lock poisoned; skipping component mentions");
                return Vec::new();
            }
        };

        let mut indices = fuzzy.mentioned(prompt, &names);
        if indices.is_empty() {
            // Misspelled names: best ranked hit per word of similar length
            for word in prompt
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| w.chars().count() >= MIN_FUZZY_WORD)
            {
                let word = word.to_lowercase();
                let Some(&(idx, _)) = fuzzy.rank(&word, &names, 1).first() else {
                    continue;
                };
                let spread = names[idx].chars().count().abs_diff(word.chars().count());
                if spread <= MAX_FUZZY_LENGTH_SPREAD && !indices.contains(&idx) {
                    log::debug!("Treating '{word}' as a mention of {}", names[idx]);
                    indices.push(idx);
                }
            }
        }
        indices.into_iter().map(|idx| names[idx].to_string()).collect()
    }

    fn find_targets(&self, prompt: &str, category: EditCategory, manifest: &Manifest) -> Targets {
        let mut files: Vec<String> = Vec::new();

        for mention in EXPLICIT_PATH.iter().flat_map(|re| re.find_iter(prompt)) {
            let mention = normalize_path(mention.as_str());
            let found = manifest.list_paths().find(|path| {
                *path == mention
                    || path.ends_with(&format!("/{mention}"))
                    || (!mention.contains('/') && file_name(path) == mention)
            });
            if let Some(path) = found {
                push_unique(&mut files, path);
            }
        }
        let explicit = !files.is_empty();

        let mut components = false;
        for name in self.mentioned_components(prompt, manifest) {
            if let Some(path) = manifest.component_path(&name) {
                push_unique(&mut files, path);
                components = true;
            }
        }

        if files.is_empty() {
            let essentials = ContextAssembler::new(manifest, &self.config);
            let fallback = match category {
                EditCategory::UpdateStyle => essentials
                    .global_stylesheet()
                    .or_else(|| essentials.theme_config()),
                EditCategory::AddFeature => essentials.entry_component(),
                EditCategory::AddDependency => manifest
                    .list_paths()
                    .find(|path| file_name(path) == "package.json"),
                _ => None,
            };
            if let Some(path) = fallback {
                push_unique(&mut files, path);
            }
        }

        Targets {
            files,
            explicit,
            components,
        }
    }

    /// Coarse intent: category, targets and confidence.
    pub fn classify_intent(&self, prompt: &str, manifest: &Manifest) -> EditIntent {
        let category = Self::categorize(prompt);
        let targets = self.find_targets(prompt, category, manifest);
        let confidence = if targets.explicit {
            0.9
        } else if targets.components {
            0.7
        } else {
            0.5
        };
        let description = match targets.files.len() {
            0 => format!("{category} request with no specific target"),
            n => format!("{category} request targeting {n} file(s)"),
        };

        let mut intent = EditIntent::new(category, description, confidence).with_targets(targets.files);
        intent.search_terms = Self::search_terms(prompt);
        intent
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl IntentClassifier for HeuristicClassifier {
    /// A search plan when the request names literal text for a single-point
    /// edit, otherwise an edit intent.
    fn classify(&self, prompt: &str, manifest: &Manifest) -> anyhow::Result<Classification> {
        let intent = self.classify_intent(prompt, manifest);
        if !intent.category.is_single_point() || intent.search_terms.is_empty() {
            return Ok(Classification::Intent(intent));
        }

        let fallback_terms = self.mentioned_components(prompt, manifest);
        let mut plan = SearchPlan::new(intent.category).with_terms(intent.search_terms.clone());
        plan.reasoning = format!("Request names literal text: {}", intent.search_terms.join(", "));
        if !fallback_terms.is_empty() {
            plan = plan.with_fallback(SearchFallback {
                terms: fallback_terms,
                patterns: Vec::new(),
            });
        }
        Ok(Classification::Plan(plan))
    }
}
