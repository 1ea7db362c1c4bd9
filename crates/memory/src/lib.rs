//! # Context Memory
//!
//! Bounded conversation memory for the edit-targeting engine.
//!
//! A [`ConversationState`] keeps the turn log (hard-truncated once it grows
//! past `max_messages`), a cumulative [`SessionSummary`] that survives
//! eviction, the edit history, a major-change log and preferences inferred
//! from the retained requests. [`render_summary_prompt`] turns it into a
//! size-capped digest for the model prompt.
//!
//! [`SessionStore`] keys states by session id for multi-tenant callers.

mod config;
mod error;
mod preferences;
mod render;
mod state;
mod store;
mod types;

pub use config::MemoryConfig;
pub use error::{MemoryError, Result};
pub use preferences::{infer_common_patterns, infer_edit_style};
pub use render::{
    build_conversation_history_prompt, recent_interactions, relative_time, render_summary_prompt,
    render_summary_prompt_at, Interaction, TRUNCATION_NOTICE,
};
pub use state::{describe_counts, update_conversation_memory};
pub use store::SessionStore;
pub use types::{
    AiResult, AppliedFile, ConversationMessage, ConversationState, EditRecord, EditStyle,
    FileAction, MajorChange, MessageMetadata, Role, SessionSummary, UserPreferences,
};
