use chrono::{DateTime, Utc};
use context_protocol::{EditCategory, EditIntent};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Created,
    Modified,
    Deleted,
}

/// A file the generator wrote, as reported back by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFile {
    pub path: String,
    pub action: FileAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}

impl AppliedFile {
    pub fn created(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            action: FileAction::Created,
            component_name: None,
        }
    }

    pub fn modified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            action: FileAction::Modified,
            component_name: None,
        }
    }

    pub fn with_component(mut self, name: impl Into<String>) -> Self {
        self.component_name = Some(name.into());
        self
    }
}

/// Outcome of one generation round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiResult {
    pub action_summary: Option<String>,
    pub raw_response: Option<String>,
    pub applied_files: Vec<AppliedFile>,
    pub packages_added: Vec<String>,
    pub edit_intent: Option<EditIntent>,
}

impl AiResult {
    pub fn created_components(&self) -> impl Iterator<Item = &str> {
        self.applied_files
            .iter()
            .filter(|file| file.action == FileAction::Created)
            .filter_map(|file| file.component_name.as_deref())
    }

    pub fn created_file_count(&self) -> usize {
        self.applied_files
            .iter()
            .filter(|file| file.action == FileAction::Created)
            .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageMetadata {
    pub applied_files: Vec<String>,
    pub packages_added: Vec<String>,
    pub action_summary: Option<String>,
    pub files_count: usize,
    pub components_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

/// Cumulative roll-up; never shrinks on log eviction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSummary {
    pub total_interactions: u64,
    pub files_created: IndexSet<String>,
    pub files_modified: IndexSet<String>,
    pub packages_added: IndexSet<String>,
    pub components_created: IndexSet<String>,
    pub last_action_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub timestamp: DateTime<Utc>,
    pub user_request: String,
    pub category: EditCategory,
    pub target_files: Vec<String>,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorChange {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub files_affected: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditStyle {
    #[default]
    Targeted,
    Comprehensive,
}

impl EditStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Targeted => "targeted",
            Self::Comprehensive => "comprehensive",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub edit_style: EditStyle,
    pub common_patterns: Vec<String>,
}

/// Everything remembered about one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub conversation_id: String,
    pub started_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub edit_history: Vec<EditRecord>,
    #[serde(default)]
    pub current_topic: Option<String>,
    #[serde(default)]
    pub project_evolution: Vec<MajorChange>,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub summary: SessionSummary,
}
