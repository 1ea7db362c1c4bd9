use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};

/// Module-resolution and essential-file conventions of the target project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    /// Code extensions in resolution precedence order
    pub code_extensions: Vec<String>,

    /// Extensions accepted as-is on an import specifier besides code ones
    pub asset_extensions: Vec<String>,

    /// Basename of directory index files
    pub index_basename: String,

    /// File names accepted as the application entry component
    pub entry_file_names: Vec<String>,

    /// File names accepted as the design/theme configuration
    pub theme_file_names: Vec<String>,

    /// File names accepted as the global stylesheet
    pub stylesheet_file_names: Vec<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            code_extensions: strings(&[".jsx", ".js", ".tsx", ".ts"]),
            asset_extensions: strings(&[".css", ".json"]),
            index_basename: "index".to_string(),
            entry_file_names: strings(&["App.jsx", "App.tsx", "App.js", "App.ts"]),
            theme_file_names: strings(&[
                "tailwind.config.js",
                "tailwind.config.ts",
                "tailwind.config.cjs",
                "tailwind.config.mjs",
            ]),
            stylesheet_file_names: strings(&["index.css", "globals.css"]),
        }
    }
}

impl ContextConfig {
    pub fn validate(&self) -> Result<()> {
        if self.code_extensions.is_empty() {
            return Err(GraphError::InvalidConfig(
                "code_extensions must not be empty".to_string(),
            ));
        }
        for ext in self.code_extensions.iter().chain(&self.asset_extensions) {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(GraphError::InvalidConfig(format!(
                    "extension '{ext}' must start with '.'"
                )));
            }
        }
        if self.index_basename.trim().is_empty() {
            return Err(GraphError::InvalidConfig(
                "index_basename must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
