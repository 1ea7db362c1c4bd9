use crate::config::MemoryConfig;
use crate::preferences::infer_preferences;
use crate::types::{
    AiResult, ConversationMessage, ConversationState, EditRecord, FileAction, MajorChange,
    MessageMetadata, Role,
};
use chrono::{DateTime, Utc};
use context_protocol::EditCategory;
use uuid::Uuid;

/// Files created in one round that make it a major change.
const MAJOR_CHANGE_CREATED_FILES: usize = 3;

fn message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Drop the oldest entries so at most `limit` remain.
fn keep_last<T>(items: &mut Vec<T>, limit: usize) {
    if items.len() > limit {
        items.drain(..items.len() - limit);
    }
}

/// "Modified 2 file(s), created 1 component(s)"; "Generated code" when
/// nothing was touched.
pub fn describe_counts(files: usize, components: usize, packages: usize) -> String {
    let mut parts = Vec::new();
    if files > 0 {
        parts.push(format!("Modified {files} file(s)"));
    }
    if components > 0 {
        parts.push(format!("created {components} component(s)"));
    }
    if packages > 0 {
        parts.push(format!("added {packages} package(s)"));
    }
    if parts.is_empty() {
        "Generated code".to_string()
    } else {
        parts.join(", ")
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            conversation_id: Uuid::new_v4().to_string(),
            started_at: now,
            last_updated: now,
            messages: Vec::new(),
            edit_history: Vec::new(),
            current_topic: None,
            project_evolution: Vec::new(),
            preferences: Default::default(),
            summary: Default::default(),
        }
    }

    pub fn from_json_str(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        self.current_topic = (!topic.trim().is_empty()).then_some(topic);
    }

    /// Record a user turn and, when present, the generation result.
    pub fn append(&mut self, user_message: &str, ai_result: Option<&AiResult>, config: &MemoryConfig) {
        self.append_at(Utc::now(), user_message, ai_result, config);
    }

    pub fn append_at(
        &mut self,
        now: DateTime<Utc>,
        user_message: &str,
        ai_result: Option<&AiResult>,
        config: &MemoryConfig,
    ) {
        self.messages.push(ConversationMessage {
            id: message_id(),
            role: Role::User,
            content: user_message.to_string(),
            timestamp: now,
            metadata: None,
        });

        if let Some(result) = ai_result {
            self.messages.push(assistant_message(result, now));
            self.record_result(user_message, result, now, config);
        }

        self.enforce_window(config);
        self.preferences = infer_preferences(&self.messages, config.pattern_limit);
        self.last_updated = now;
    }

    /// Hard truncation: once the log exceeds `max_messages`, keep only the
    /// newest `retain_messages`. Summary lists are untouched.
    pub fn enforce_window(&mut self, config: &MemoryConfig) {
        if self.messages.len() > config.max_messages {
            let evicted = self.messages.len() - config.retain_messages;
            keep_last(&mut self.messages, config.retain_messages);
            log::debug!(
                "Evicted {evicted} message(s) from conversation {}",
                self.conversation_id
            );
        }
    }

    fn record_result(&mut self, user_message: &str, result: &AiResult, now: DateTime<Utc>, config: &MemoryConfig) {
        let summary = &mut self.summary;
        for file in &result.applied_files {
            match file.action {
                FileAction::Created => {
                    summary.files_created.insert(file.path.clone());
                    if let Some(name) = &file.component_name {
                        summary.components_created.insert(name.clone());
                    }
                }
                FileAction::Modified => {
                    summary.files_modified.insert(file.path.clone());
                }
                FileAction::Deleted => {
                    log::debug!("{} deleted; not tracked in the summary", file.path);
                }
            }
        }
        for package in &result.packages_added {
            summary.packages_added.insert(package.clone());
        }
        if let Some(action) = result.action_summary.as_ref().filter(|a| !a.trim().is_empty()) {
            summary.last_action_summary = Some(action.clone());
        }
        summary.total_interactions += 1;

        if let Some(intent) = &result.edit_intent {
            self.edit_history.push(EditRecord {
                timestamp: now,
                user_request: user_message.to_string(),
                category: intent.category,
                target_files: intent.target_files.clone(),
                confidence: intent.confidence,
            });
            keep_last(&mut self.edit_history, config.edit_history_limit);
        }

        if let Some(description) = major_change_description(result) {
            self.project_evolution.push(MajorChange {
                timestamp: now,
                description,
                files_affected: result.applied_files.iter().map(|f| f.path.clone()).collect(),
            });
            keep_last(&mut self.project_evolution, config.major_change_limit);
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

fn assistant_message(result: &AiResult, now: DateTime<Utc>) -> ConversationMessage {
    let components_count = result.created_components().count();
    let action_summary = result
        .action_summary
        .clone()
        .filter(|summary| !summary.trim().is_empty());
    let content = match (&action_summary, &result.raw_response) {
        (Some(summary), _) => summary.clone(),
        (None, Some(raw)) if !raw.trim().is_empty() => raw.clone(),
        _ => describe_counts(
            result.applied_files.len(),
            components_count,
            result.packages_added.len(),
        ),
    };

    ConversationMessage {
        id: message_id(),
        role: Role::Assistant,
        content,
        timestamp: now,
        metadata: Some(MessageMetadata {
            applied_files: result.applied_files.iter().map(|f| f.path.clone()).collect(),
            packages_added: result.packages_added.clone(),
            action_summary,
            files_count: result.applied_files.len(),
            components_count,
        }),
    }
}

fn major_change_description(result: &AiResult) -> Option<String> {
    let label = result.action_summary.as_deref().filter(|s| !s.trim().is_empty());
    match result.edit_intent.as_ref().map(|intent| intent.category) {
        Some(EditCategory::FullRebuild) => Some(format!(
            "Full rebuild: {}",
            label.unwrap_or("application regenerated")
        )),
        Some(EditCategory::AddDependency) => Some(if result.packages_added.is_empty() {
            format!("Dependency change: {}", label.unwrap_or("packages updated"))
        } else {
            format!("Added packages: {}", result.packages_added.join(", "))
        }),
        _ if result.created_file_count() >= MAJOR_CHANGE_CREATED_FILES => Some(format!(
            "Created {} files: {}",
            result.created_file_count(),
            label.unwrap_or("new feature")
        )),
        _ => None,
    }
}

/// Append a turn with the default bounds.
pub fn update_conversation_memory(state: &mut ConversationState, user_message: &str, ai_result: Option<&AiResult>) {
    state.append(user_message, ai_result, &MemoryConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppliedFile;
    use context_protocol::EditIntent;
    use pretty_assertions::assert_eq;

    fn result_creating(paths: &[&str]) -> AiResult {
        AiResult {
            applied_files: paths.iter().map(|p| AppliedFile::created(*p)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn user_only_append_does_not_count_as_interaction() {
        let mut state = ConversationState::new();
        state.append("hello", None, &MemoryConfig::default());
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.summary.total_interactions, 0);
    }

    #[test]
    fn assistant_message_prefers_action_summary() {
        let mut state = ConversationState::new();
        let result = AiResult {
            action_summary: Some("Made the header blue".to_string()),
            raw_response: Some("<file>...</file>".to_string()),
            applied_files: vec![AppliedFile::modified("src/Header.jsx")],
            ..Default::default()
        };
        state.append("make header blue", Some(&result), &MemoryConfig::default());

        let reply = &state.messages[1];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "Made the header blue");
        assert_eq!(reply.metadata.as_ref().unwrap().files_count, 1);
    }

    #[test]
    fn assistant_message_is_synthesized_without_text() {
        let mut state = ConversationState::new();
        let result = AiResult {
            applied_files: vec![AppliedFile::created("src/Card.jsx").with_component("Card")],
            packages_added: vec!["framer-motion".to_string()],
            ..Default::default()
        };
        state.append("add a card", Some(&result), &MemoryConfig::default());
        assert_eq!(
            state.messages[1].content,
            "Modified 1 file(s), created 1 component(s), added 1 package(s)"
        );
    }

    #[test]
    fn summary_lists_deduplicate_in_insertion_order() {
        let mut state = ConversationState::new();
        let config = MemoryConfig::default();
        let first = AiResult {
            applied_files: vec![
                AppliedFile::created("src/Card.jsx").with_component("Card"),
                AppliedFile::modified("src/App.jsx"),
            ],
            packages_added: vec!["clsx".to_string()],
            ..Default::default()
        };
        let second = AiResult {
            applied_files: vec![
                AppliedFile::modified("src/App.jsx"),
                AppliedFile::modified("src/Card.jsx"),
            ],
            packages_added: vec!["clsx".to_string()],
            ..Default::default()
        };
        state.append("add card", Some(&first), &config);
        state.append("tweak card", Some(&second), &config);

        let summary = &state.summary;
        assert_eq!(summary.total_interactions, 2);
        assert_eq!(summary.files_created.iter().collect::<Vec<_>>(), vec!["src/Card.jsx"]);
        assert_eq!(
            summary.files_modified.iter().collect::<Vec<_>>(),
            vec!["src/App.jsx", "src/Card.jsx"]
        );
        assert_eq!(summary.components_created.len(), 1);
        assert_eq!(summary.packages_added.len(), 1);
    }

    #[test]
    fn eviction_keeps_newest_fifteen() {
        let mut state = ConversationState::new();
        let config = MemoryConfig::default();
        for i in 0..10 {
            state.append(&format!("request {i}"), Some(&AiResult::default()), &config);
        }
        assert_eq!(state.messages.len(), 20);

        state.append("request 10", Some(&AiResult::default()), &config);
        assert_eq!(state.messages.len(), 15);
        assert_eq!(state.messages.last().unwrap().role, Role::Assistant);
        assert_eq!(state.summary.total_interactions, 11);
        assert!(state.messages.iter().all(|m| m.content != "request 0"));
    }

    #[test]
    fn major_changes_are_recorded_and_bounded() {
        let mut state = ConversationState::new();
        let config = MemoryConfig::default();

        state.append("small", Some(&result_creating(&["a.jsx", "b.jsx"])), &config);
        assert!(state.project_evolution.is_empty());

        state.append("big", Some(&result_creating(&["a.jsx", "b.jsx", "c.jsx"])), &config);
        assert_eq!(state.project_evolution.len(), 1);
        assert!(state.project_evolution[0].description.starts_with("Created 3 files"));

        let rebuild = AiResult {
            edit_intent: Some(EditIntent::new(EditCategory::FullRebuild, "start over", 0.9)),
            ..Default::default()
        };
        for _ in 0..12 {
            state.append("rebuild", Some(&rebuild), &config);
        }
        assert_eq!(state.project_evolution.len(), config.major_change_limit);
        assert!(state
            .project_evolution
            .iter()
            .all(|change| change.description.starts_with("Full rebuild")));
        assert_eq!(state.edit_history.len(), 12);
    }

    #[test]
    fn edit_history_is_bounded() {
        let mut state = ConversationState::new();
        let config = MemoryConfig::default();
        let result = AiResult {
            edit_intent: Some(
                EditIntent::new(EditCategory::UpdateStyle, "color", 0.7)
                    .with_targets(["src/Header.jsx".to_string()]),
            ),
            ..Default::default()
        };
        for i in 0..60 {
            state.append(&format!("turn {i}"), Some(&result), &config);
        }
        assert_eq!(state.edit_history.len(), config.edit_history_limit);
        assert_eq!(state.edit_history.last().unwrap().user_request, "turn 59");
        assert_eq!(state.edit_history[0].target_files, vec!["src/Header.jsx"]);
    }

    #[test]
    fn topic_is_cleared_by_blank_input() {
        let mut state = ConversationState::new();
        state.set_topic("pricing page");
        assert_eq!(state.current_topic.as_deref(), Some("pricing page"));
        state.set_topic("  ");
        assert!(state.current_topic.is_none());
    }

    #[test]
    fn describe_counts_defaults_to_generated_code() {
        assert_eq!(describe_counts(0, 0, 0), "Generated code");
        assert_eq!(describe_counts(2, 0, 0), "Modified 2 file(s)");
    }
}
