use anyhow::{Context, Result};
use context_graph::ContextConfig;
use context_memory::MemoryConfig;
use context_prompt::PromptConfig;
use context_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = ".edit-context.toml";

/// Engine configuration, one table per subsystem.
///
/// ```toml
/// [context]
/// entry_file_names = ["App.tsx"]
///
/// [search]
/// max_results = 20
///
/// [memory]
/// summary_max_chars = 1500
///
/// [prompt]
/// context_file_max_chars = 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub context: ContextConfig,
    pub search: SearchConfig,
    pub memory: MemoryConfig,
    pub prompt: PromptConfig,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Invalid engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.context.validate().context("[context]")?;
        self.search.validate().context("[search]")?;
        self.memory.validate().context("[memory]")?;
        self.prompt.validate().context("[prompt]")?;
        Ok(())
    }

    /// Explicit path, else `.edit-context.toml` in `workdir` when present,
    /// else defaults.
    pub fn load(explicit: Option<&Path>, workdir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(workdir.join(DEFAULT_CONFIG_FILE)).filter(|path| path.is_file()),
        };
        let Some(path) = path else {
            log::debug!("No {DEFAULT_CONFIG_FILE} found; using defaults");
            return Ok((Self::default(), None));
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        log::debug!("Loaded engine configuration from {}", path.display());
        Ok((config, Some(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_tables_override_single_fields() {
        let config = EngineConfig::from_toml_str(
            "[search]\nmax_results = 5\n\n[prompt]\ncontext_file_max_chars = 100\n",
        )
        .unwrap();
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.context_lines, SearchConfig::default().context_lines);
        assert_eq!(config.prompt.context_file_max_chars, 100);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EngineConfig::from_toml_str("[search]\nmax_hits = 5\n").is_err());
        assert!(EngineConfig::from_toml_str("[index]\n").is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = EngineConfig::from_toml_str("[memory]\nmax_messages = 10\nretain_messages = 10\n")
            .unwrap_err();
        assert!(format!("{err:#}").contains("[memory]"));
    }

    #[test]
    fn missing_default_file_falls_back() {
        let dir = std::env::temp_dir().join("edit-context-no-config-here");
        let (config, path) = EngineConfig::load(None, &dir).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(path.is_none());
    }
}
