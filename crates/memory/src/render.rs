use crate::config::MemoryConfig;
use crate::state::describe_counts;
use crate::types::{ConversationMessage, ConversationState, Role};
use chrono::{DateTime, Utc};
use context_protocol::budget::{clip_with_notice, excerpt};
use indexmap::IndexSet;
use std::fmt::Write;

pub const TRUNCATION_NOTICE: &str = "\n[... conversation summary truncated ...]";

/// "just now", "5m ago", "3h ago", "2d ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

/// User message paired with the assistant reply right after it.
pub struct Interaction<'a> {
    pub user: &'a ConversationMessage,
    pub assistant: Option<&'a ConversationMessage>,
}

/// The newest `limit` interactions, oldest first.
pub fn recent_interactions(messages: &[ConversationMessage], limit: usize) -> Vec<Interaction<'_>> {
    let mut pairs = Vec::new();
    for (idx, message) in messages.iter().enumerate().rev() {
        if pairs.len() == limit {
            break;
        }
        if message.role != Role::User {
            continue;
        }
        let assistant = messages
            .get(idx + 1)
            .filter(|next| next.role == Role::Assistant);
        pairs.push(Interaction {
            user: message,
            assistant,
        });
    }
    pairs.reverse();
    pairs
}

fn interaction_action(assistant: Option<&ConversationMessage>) -> String {
    let Some(message) = assistant else {
        return "(awaiting response)".to_string();
    };
    match &message.metadata {
        Some(meta) => meta
            .action_summary
            .clone()
            .unwrap_or_else(|| describe_counts(meta.files_count, meta.components_count, meta.packages_added.len())),
        None => describe_counts(0, 0, 0),
    }
}

/// Newest `limit` entries of an insertion-ordered set, plus how many were left out.
fn rollup(set: &IndexSet<String>, limit: usize) -> Option<String> {
    if set.is_empty() {
        return None;
    }
    let hidden = set.len().saturating_sub(limit);
    let shown: Vec<&str> = set.iter().skip(hidden).map(String::as_str).collect();
    let mut line = shown.join(", ");
    if hidden > 0 {
        let _ = write!(line, " (+{hidden} more)");
    }
    Some(line)
}

/// Compact digest of a conversation, at most `summary_max_chars` plus the
/// truncation notice.
pub fn render_summary_prompt_at(state: &ConversationState, now: DateTime<Utc>, config: &MemoryConfig) -> String {
    let mut out = String::from("## CONVERSATION HISTORY\n\n");
    let _ = writeln!(
        out,
        "Session started: {} ({})",
        state.started_at.format("%Y-%m-%d %H:%M UTC"),
        relative_time(state.started_at, now)
    );
    let _ = writeln!(out, "Total interactions: {}", state.summary.total_interactions);

    let interactions = recent_interactions(&state.messages, config.recent_interactions);
    if !interactions.is_empty() {
        out.push_str("\n### Recent interactions\n");
        for (n, interaction) in interactions.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. User: \"{}\"\n   Result: {}",
                n + 1,
                excerpt(&interaction.user.content, config.excerpt_chars),
                interaction_action(interaction.assistant)
            );
        }
    }

    let summary = &state.summary;
    let rollups = [
        ("Files created", &summary.files_created),
        ("Files modified", &summary.files_modified),
        ("Components created", &summary.components_created),
        ("Packages added", &summary.packages_added),
    ];
    let rollup_lines: Vec<String> = rollups
        .iter()
        .filter_map(|(label, set)| {
            rollup(set, config.rollup_limit).map(|line| format!("- {label}: {line}"))
        })
        .collect();
    if !rollup_lines.is_empty() {
        out.push_str("\n### Project changes so far\n");
        for line in rollup_lines {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push_str("\n### User preferences\n");
    let _ = writeln!(out, "- Edit style: {}", state.preferences.edit_style.as_str());
    let patterns: Vec<&str> = state
        .preferences
        .common_patterns
        .iter()
        .take(config.pattern_limit)
        .map(String::as_str)
        .collect();
    if !patterns.is_empty() {
        let _ = writeln!(out, "- Common requests: {}", patterns.join(", "));
    }

    if let Some(topic) = &state.current_topic {
        let _ = writeln!(out, "\n### Current topic\n{topic}");
    }

    let shown = state.project_evolution.len().saturating_sub(config.major_changes_shown);
    let major: Vec<_> = state.project_evolution[shown..].iter().rev().collect();
    if !major.is_empty() {
        out.push_str("\n### Recent major changes\n");
        for change in major {
            let _ = writeln!(
                out,
                "- {} ({})",
                change.description,
                relative_time(change.timestamp, now)
            );
        }
    }

    let clipped = clip_with_notice(&out, config.summary_max_chars, TRUNCATION_NOTICE);
    if clipped.len() != out.len() {
        log::debug!(
            "Conversation summary clipped to {} characters",
            config.summary_max_chars
        );
    }
    clipped
}

pub fn render_summary_prompt(state: &ConversationState, config: &MemoryConfig) -> String {
    render_summary_prompt_at(state, Utc::now(), config)
}

/// History block for the assembled prompt; empty for a fresh conversation.
pub fn build_conversation_history_prompt(state: &ConversationState) -> String {
    if state.messages.is_empty() && state.summary.total_interactions == 0 {
        return String::new();
    }
    render_summary_prompt(state, &MemoryConfig::default())
}
