use crate::config::ContextConfig;
use context_protocol::paths::{has_extension, parent_dir};
use context_protocol::Manifest;
use std::collections::{BTreeSet, HashSet};

/// Anything that can answer "does this project path exist".
pub trait PathLookup {
    fn contains_path(&self, path: &str) -> bool;
}

impl PathLookup for Manifest {
    fn contains_path(&self, path: &str) -> bool {
        self.contains(path)
    }
}

impl PathLookup for HashSet<String> {
    fn contains_path(&self, path: &str) -> bool {
        self.contains(path)
    }
}

impl PathLookup for BTreeSet<String> {
    fn contains_path(&self, path: &str) -> bool {
        self.contains(path)
    }
}

impl<S: AsRef<str>> PathLookup for [S] {
    fn contains_path(&self, path: &str) -> bool {
        self.iter().any(|candidate| candidate.as_ref() == path)
    }
}

impl<S: AsRef<str>> PathLookup for Vec<S> {
    fn contains_path(&self, path: &str) -> bool {
        self.as_slice().contains_path(path)
    }
}

impl<S: AsRef<str>, const N: usize> PathLookup for [S; N] {
    fn contains_path(&self, path: &str) -> bool {
        self.as_slice().contains_path(path)
    }
}

/// Whether a specifier is project-relative (`./x`, `../x`, `.`, `..`).
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == ".."
}

/// Resolve an import specifier written in `from_file` to a concrete project
/// path.
///
/// Bare (package) specifiers are not local and resolve to `None`, as does a
/// relative specifier none of whose candidates exist in `known`.
pub fn resolve_import_path<L>(
    from_file: &str,
    specifier: &str,
    known: &L,
    config: &ContextConfig,
) -> Option<String>
where
    L: PathLookup + ?Sized,
{
    if !is_relative_specifier(specifier) {
        return None;
    }

    let base = parent_dir(from_file);
    let absolute = from_file.starts_with('/');
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut joined = segments.join("/");
    if absolute {
        joined.insert(0, '/');
    }

    let directory = specifier.ends_with('/') || specifier == "." || specifier == "..";
    let candidates: Vec<String> = if directory {
        config
            .code_extensions
            .iter()
            .map(|ext| {
                let index = format!("{}{ext}", config.index_basename);
                if joined.is_empty() || joined.ends_with('/') {
                    format!("{joined}{index}")
                } else {
                    format!("{joined}/{index}")
                }
            })
            .collect()
    } else if has_extension(&joined, &config.code_extensions)
        || has_extension(&joined, &config.asset_extensions)
    {
        vec![joined]
    } else {
        config
            .code_extensions
            .iter()
            .map(|ext| format!("{joined}{ext}"))
            .collect()
    };

    candidates
        .into_iter()
        .find(|candidate| known.contains_path(candidate))
}
