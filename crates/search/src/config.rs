use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Extensions searched when a plan names none
    pub default_file_types: Vec<String>,

    /// Neighbouring lines captured on each side of a match
    pub context_lines: usize,

    /// Cap on returned results after ranking
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_file_types: [".jsx", ".js", ".tsx", ".ts"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            context_lines: 3,
            max_results: 50,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_file_types.is_empty() {
            return Err(SearchError::InvalidConfig(
                "default_file_types must not be empty".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(SearchError::InvalidConfig(
                "max_results must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
