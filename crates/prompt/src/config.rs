use crate::error::{PromptError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    /// Characters of each context file embedded in the prompt. Files to edit
    /// are never cut.
    pub context_file_max_chars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            context_file_max_chars: 2000,
        }
    }
}

impl PromptConfig {
    pub fn validate(&self) -> Result<()> {
        if self.context_file_max_chars == 0 {
            return Err(PromptError::InvalidConfig(
                "context_file_max_chars must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
