//! Project-relative path helpers shared by the manifest, the context builder
//! and the search executor. Paths always use `/` separators.

/// Normalize a raw path: unify separators and strip leading `./`.
pub fn normalize_path(raw: &str) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while value.starts_with("./") {
        value = value[2..].to_string();
    }
    value
}

/// Last path segment (`src/components/Header.jsx` -> `Header.jsx`).
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory part of `path` without the trailing separator.
///
/// Returns `""` for bare file names and `"/"` for files at an absolute root.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Extension of the file name including the leading dot (`.jsx`).
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx..]),
    }
}

/// File name without its extension (`Header.jsx` -> `Header`).
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match extension(name) {
        Some(ext) => &name[..name.len() - ext.len()],
        None => name,
    }
}

/// Case-insensitive check against a list of extensions. Entries may be given
/// with or without the leading dot.
pub fn has_extension<S: AsRef<str>>(path: &str, extensions: &[S]) -> bool {
    let Some(ext) = extension(path) else {
        return false;
    };
    let ext = &ext[1..];
    extensions
        .iter()
        .any(|candidate| candidate.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Code-fence language tag for a path.
pub fn language_tag(path: &str) -> &'static str {
    match extension(path).map(str::to_ascii_lowercase).as_deref() {
        Some(".jsx") => "jsx",
        Some(".tsx") => "tsx",
        Some(".js") | Some(".mjs") | Some(".cjs") => "javascript",
        Some(".ts") => "typescript",
        Some(".css") => "css",
        Some(".scss") => "scss",
        Some(".json") => "json",
        Some(".html") => "html",
        Some(".md") => "markdown",
        _ => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_dot_prefix_and_backslashes() {
        assert_eq!(normalize_path("./src\\App.jsx"), "src/App.jsx");
        assert_eq!(normalize_path("././a.js"), "a.js");
        assert_eq!(normalize_path("/abs/x.ts"), "/abs/x.ts");
    }

    #[test]
    fn parent_dir_handles_roots() {
        assert_eq!(parent_dir("/a/b/C.jsx"), "/a/b");
        assert_eq!(parent_dir("/C.jsx"), "/");
        assert_eq!(parent_dir("C.jsx"), "");
        assert_eq!(parent_dir("src/C.jsx"), "src");
    }

    #[test]
    fn extension_and_stem() {
        assert_eq!(extension("src/App.jsx"), Some(".jsx"));
        assert_eq!(extension("src/.env"), None);
        assert_eq!(extension("Makefile"), None);
        assert_eq!(file_stem("src/tailwind.config.js"), "tailwind.config");
        assert_eq!(file_stem("README"), "README");
    }

    #[test]
    fn has_extension_accepts_dotted_and_bare_entries() {
        assert!(has_extension("a/B.JSX", &[".jsx"]));
        assert!(has_extension("a/B.tsx", &["tsx"]));
        assert!(!has_extension("a/B.css", &[".jsx", ".tsx"]));
        assert!(!has_extension("a/B", &[".jsx"]));
    }

    #[test]
    fn language_tags() {
        assert_eq!(language_tag("src/App.jsx"), "jsx");
        assert_eq!(language_tag("src/index.css"), "css");
        assert_eq!(language_tag("LICENSE"), "text");
    }
}
