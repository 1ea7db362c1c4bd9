use crate::error::{Result, SearchError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Which files a search plan may look at.
///
/// Entries are extensions (`.jsx`, `jsx`) or globs (`src/**/*.tsx`); matching
/// is case-insensitive.
#[derive(Debug, Clone)]
pub struct FileTypeFilter {
    set: GlobSet,
}

impl FileTypeFilter {
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for entry in entries {
            let raw = entry.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let pattern = if raw.contains('*') || raw.contains('?') || raw.contains('/') {
                raw.to_string()
            } else {
                format!("*.{}", raw.trim_start_matches('.'))
            };
            let glob = GlobBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| SearchError::InvalidFileType {
                    filter: raw.to_string(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| SearchError::InvalidFileType {
            filter: "<set>".to_string(),
            source,
        })?;
        Ok(Self { set })
    }

    /// Filter that matches nothing.
    pub fn none() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.set.is_match(path.trim_start_matches('/'))
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_match_anywhere_in_tree() {
        let filter = FileTypeFilter::new(&[".jsx", "tsx"]).unwrap();
        assert!(filter.matches("src/components/Header.jsx"));
        assert!(filter.matches("/abs/src/App.TSX"));
        assert!(filter.matches("App.jsx"));
        assert!(!filter.matches("src/index.css"));
        assert!(!filter.matches("src/App.jsx.bak"));
    }

    #[test]
    fn globs_pass_through() {
        let filter = FileTypeFilter::new(&["src/components/*.jsx"]).unwrap();
        assert!(filter.matches("src/components/Header.jsx"));
        assert!(!filter.matches("src/App.jsx"));
    }

    #[test]
    fn invalid_glob_is_reported() {
        assert!(matches!(
            FileTypeFilter::new(&["src/[.jsx"]),
            Err(SearchError::InvalidFileType { .. })
        ));
    }

    #[test]
    fn blank_entries_are_ignored() {
        let filter = FileTypeFilter::new(&["  "]).unwrap();
        assert!(filter.is_empty());
        assert!(!filter.matches("src/App.jsx"));
    }
}
