use crate::error::{MemoryError, Result};
use serde::{Deserialize, Serialize};

/// Bounds of the conversation log and the rendered digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Log length that triggers eviction
    pub max_messages: usize,

    /// Messages kept once eviction triggers
    pub retain_messages: usize,

    /// Interaction pairs shown in the digest
    pub recent_interactions: usize,

    /// Characters of each user message shown in the digest
    pub excerpt_chars: usize,

    /// Entries shown per roll-up list
    pub rollup_limit: usize,

    /// Common request patterns shown
    pub pattern_limit: usize,

    pub major_change_limit: usize,

    pub major_changes_shown: usize,

    pub edit_history_limit: usize,

    /// Hard cap on the rendered digest
    pub summary_max_chars: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_messages: 20,
            retain_messages: 15,
            recent_interactions: 5,
            excerpt_chars: 80,
            rollup_limit: 5,
            pattern_limit: 3,
            major_change_limit: 10,
            major_changes_shown: 2,
            edit_history_limit: 50,
            summary_max_chars: 2000,
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.retain_messages == 0 || self.retain_messages >= self.max_messages {
            return Err(MemoryError::InvalidConfig(format!(
                "retain_messages ({}) must be in 1..max_messages ({})",
                self.retain_messages, self.max_messages
            )));
        }
        let budgets = [
            ("recent_interactions", self.recent_interactions),
            ("excerpt_chars", self.excerpt_chars),
            ("rollup_limit", self.rollup_limit),
            ("major_change_limit", self.major_change_limit),
            ("edit_history_limit", self.edit_history_limit),
            ("summary_max_chars", self.summary_max_chars),
        ];
        if let Some((name, _)) = budgets.iter().find(|(_, value)| *value == 0) {
            return Err(MemoryError::InvalidConfig(format!("{name} must be > 0")));
        }
        Ok(())
    }
}
