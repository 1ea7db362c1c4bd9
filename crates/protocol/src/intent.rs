use crate::error::{ProtocolError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of edit a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EditCategory {
    #[serde(alias = "UPDATE_COMPONENT")]
    UpdateComponent,
    #[serde(alias = "ADD_FEATURE")]
    AddFeature,
    #[serde(alias = "FIX_ISSUE")]
    FixIssue,
    #[serde(alias = "UPDATE_STYLE")]
    UpdateStyle,
    #[serde(alias = "REFACTOR")]
    Refactor,
    #[serde(alias = "FULL_REBUILD")]
    FullRebuild,
    #[serde(alias = "ADD_DEPENDENCY")]
    AddDependency,
    #[serde(alias = "REMOVE_ELEMENT")]
    RemoveElement,
}

impl EditCategory {
    pub const ALL: [EditCategory; 8] = [
        Self::UpdateComponent,
        Self::AddFeature,
        Self::FixIssue,
        Self::UpdateStyle,
        Self::Refactor,
        Self::FullRebuild,
        Self::AddDependency,
        Self::RemoveElement,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpdateComponent => "update-component",
            Self::AddFeature => "add-feature",
            Self::FixIssue => "fix-issue",
            Self::UpdateStyle => "update-style",
            Self::Refactor => "refactor",
            Self::FullRebuild => "full-rebuild",
            Self::AddDependency => "add-dependency",
            Self::RemoveElement => "remove-element",
        }
    }

    /// Categories whose edit lands on one location in one file.
    pub const fn is_single_point(self) -> bool {
        matches!(
            self,
            Self::UpdateStyle | Self::FixIssue | Self::UpdateComponent | Self::RemoveElement
        )
    }
}

impl fmt::Display for EditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditCategory {
    type Err = ProtocolError;

    /// Accepts both `update-style` and `UPDATE_STYLE`.
    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ProtocolError::UnknownCategory(raw.to_string()))
    }
}

/// Coarse classification of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EditIntent {
    #[serde(alias = "type")]
    pub category: EditCategory,

    pub description: String,

    /// In `[0, 1]`
    pub confidence: f32,

    #[serde(default, alias = "targetFiles")]
    pub target_files: Vec<String>,

    #[serde(default, alias = "searchTerms")]
    pub search_terms: Vec<String>,
}

impl EditIntent {
    pub fn new(category: EditCategory, description: impl Into<String>, confidence: f32) -> Self {
        Self {
            category,
            description: description.into(),
            confidence: confidence.clamp(0.0, 1.0),
            target_files: Vec::new(),
            search_terms: Vec::new(),
        }
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = String>) -> Self {
        self.target_files.extend(targets);
        self
    }

    /// Confidence as a whole percentage.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchFallback {
    #[serde(default)]
    pub terms: Vec<String>,

    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Classifier-produced search strategy for locating an exact edit location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchPlan {
    #[serde(alias = "editType")]
    pub edit_type: EditCategory,

    #[serde(default)]
    pub reasoning: String,

    /// Literal terms, matched case-insensitively
    #[serde(default, alias = "searchTerms")]
    pub search_terms: Vec<String>,

    #[serde(default, alias = "regexPatterns")]
    pub regex_patterns: Vec<String>,

    /// Extensions to search; empty means the project's code extensions
    #[serde(default, alias = "fileTypesToSearch")]
    pub file_types: Vec<String>,

    /// Advisory; any JSON number is accepted and saturated
    #[serde(
        default = "default_expected_matches",
        alias = "expectedMatches",
        deserialize_with = "lenient_count"
    )]
    pub expected_matches: u8,

    #[serde(default, alias = "fallbackSearch")]
    pub fallback: Option<SearchFallback>,
}

fn default_expected_matches() -> u8 {
    1
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let count = match value.as_f64() {
        Some(number) if number.is_finite() => number.round().clamp(0.0, f64::from(u8::MAX)) as u8,
        _ => default_expected_matches(),
    };
    Ok(count)
}

impl SearchPlan {
    pub fn new(edit_type: EditCategory) -> Self {
        Self {
            edit_type,
            reasoning: String::new(),
            search_terms: Vec::new(),
            regex_patterns: Vec::new(),
            file_types: Vec::new(),
            expected_matches: default_expected_matches(),
            fallback: None,
        }
    }

    pub fn with_terms<S: Into<String>>(mut self, terms: impl IntoIterator<Item = S>) -> Self {
        self.search_terms.extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn with_patterns<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.regex_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_fallback(mut self, fallback: SearchFallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Expected match count clamped to `1..=10`. Advisory only.
    pub fn expected_matches(&self) -> u8 {
        self.expected_matches.clamp(1, 10)
    }

    /// True when neither terms nor patterns carry anything searchable.
    pub fn is_empty(&self) -> bool {
        self.search_terms.iter().all(|t| t.trim().is_empty())
            && self.regex_patterns.iter().all(|p| p.trim().is_empty())
    }

    /// Parse classifier output, snake_case or camelCase.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| ProtocolError::InvalidPlan(err.to_string()))
    }
}
