use crate::error::{ProtocolError, Result};
use crate::paths::{extension, file_name, normalize_path};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role of a file inside the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Component,
    Page,
    Style,
    Config,
    #[default]
    Other,
}

impl FileKind {
    /// Classify a path by extension and directory convention.
    pub fn infer(path: &str) -> Self {
        let name = file_name(path);
        let ext = extension(path).map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some(".css") | Some(".scss") | Some(".sass") | Some(".less") => Self::Style,
            _ if name == "package.json" || name.contains(".config.") => Self::Config,
            Some(".jsx") | Some(".tsx") | Some(".js") | Some(".ts") => {
                let in_pages = path
                    .split('/')
                    .any(|segment| segment == "pages" || segment == "app");
                if in_pages {
                    Self::Page
                } else {
                    Self::Component
                }
            }
            Some(".json") => Self::Config,
            _ => Self::Other,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Page => "page",
            Self::Style => "style",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

/// One import statement of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportSpec {
    /// Raw specifier as written (`./Header`, `react`)
    pub source: String,

    /// Named bindings (`{ useState }`)
    #[serde(default)]
    pub imported_names: Vec<String>,

    /// Default binding (`import Header from ...`)
    #[serde(default)]
    pub default_import: Option<String>,

    /// Project-relative import (as opposed to a package)
    #[serde(default)]
    pub is_local: bool,
}

impl ImportSpec {
    pub fn local(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            imported_names: Vec::new(),
            default_import: None,
            is_local: true,
        }
    }

    pub fn package(source: impl Into<String>) -> Self {
        Self {
            is_local: false,
            ..Self::local(source)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ComponentInfo {
    pub name: String,

    /// Components rendered by this one, in render order
    #[serde(default)]
    pub child_components: Vec<String>,

    #[serde(default)]
    pub exports: Vec<String>,

    #[serde(default)]
    pub is_page: bool,
}

impl ComponentInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileRecord {
    /// Project-relative path; filled from the map key when omitted
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub kind: FileKind,

    #[serde(default)]
    pub imports: Vec<ImportSpec>,

    #[serde(default)]
    pub component: Option<ComponentInfo>,

    /// Unix millis
    #[serde(default)]
    pub last_modified: Option<i64>,
}

impl FileRecord {
    /// Record with the kind inferred from the path.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = normalize_path(&path.into());
        Self {
            kind: FileKind::infer(&path),
            path,
            content: content.into(),
            imports: Vec::new(),
            component: None,
            last_modified: None,
        }
    }

    pub fn with_import(mut self, import: ImportSpec) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_component(mut self, component: ComponentInfo) -> Self {
        self.component = Some(component);
        self
    }

    pub fn with_kind(mut self, kind: FileKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn component_name(&self) -> Option<&str> {
        self.component.as_ref().map(|c| c.name.as_str())
    }

    pub fn local_imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.imports.iter().filter(|import| import.is_local)
    }
}

/// Component graph node. `imports` and `imported_by` are expected to be
/// symmetric across the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ComponentTreeNode {
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub imports: Vec<String>,

    #[serde(default)]
    pub imported_by: Vec<String>,
}

/// Read-only project snapshot for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    #[serde(default)]
    pub files: BTreeMap<String, FileRecord>,

    #[serde(default)]
    pub component_tree: BTreeMap<String, ComponentTreeNode>,

    #[serde(default)]
    pub entry_point: Option<String>,

    /// Route path -> component file
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new(files: impl IntoIterator<Item = FileRecord>) -> Self {
        let files = files
            .into_iter()
            .map(|file| (file.path.clone(), file))
            .collect();
        Self {
            files,
            ..Default::default()
        }
    }

    pub fn with_entry_point(mut self, path: impl Into<String>) -> Self {
        self.entry_point = Some(normalize_path(&path.into()));
        self
    }

    pub fn with_route(mut self, route: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(route.into(), normalize_path(&path.into()));
        self
    }

    pub fn with_component_tree(mut self, tree: BTreeMap<String, ComponentTreeNode>) -> Self {
        self.component_tree = tree;
        self
    }

    /// Parse a manifest produced by the project-analysis collaborator.
    ///
    /// Records without an explicit `path` take their map key.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut manifest: Manifest = serde_json::from_str(raw)?;
        let mut normalized = BTreeMap::new();
        for (key, mut record) in std::mem::take(&mut manifest.files) {
            let key = normalize_path(&key);
            if key.is_empty() {
                return Err(ProtocolError::InvalidManifest(
                    "file entry with empty path".to_string(),
                ));
            }
            if record.path.is_empty() {
                record.path = key.clone();
            } else {
                record.path = normalize_path(&record.path);
            }
            if record.path != key {
                return Err(ProtocolError::InvalidManifest(format!(
                    "file key '{key}' does not match record path '{}'",
                    record.path
                )));
            }
            normalized.insert(key, record);
        }
        manifest.files = normalized;
        Ok(manifest)
    }

    pub fn get_file(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// All paths in lexical order.
    pub fn list_paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn component_node(&self, name: &str) -> Option<&ComponentTreeNode> {
        self.component_tree.get(name)
    }

    /// Backing file of a component: the tree node's file when it exists in
    /// the manifest, else the first file (lexical order) declaring it.
    pub fn component_path(&self, name: &str) -> Option<&str> {
        if let Some(file) = self
            .component_tree
            .get(name)
            .and_then(|node| node.file.as_deref())
        {
            if let Some(record) = self.files.get(file) {
                return Some(record.path.as_str());
            }
        }
        self.files
            .values()
            .find(|record| record.component_name() == Some(name))
            .map(|record| record.path.as_str())
    }

    /// Component declared by `path`, falling back to the tree node whose
    /// file is `path`.
    pub fn component_name_of(&self, path: &str) -> Option<&str> {
        self.files
            .get(path)
            .and_then(FileRecord::component_name)
            .or_else(|| {
                self.component_tree
                    .iter()
                    .find(|(_, node)| node.file.as_deref() == Some(path))
                    .map(|(name, _)| name.as_str())
            })
    }

    /// Component name -> backing file, for every file that declares one.
    pub fn component_files(&self) -> BTreeMap<&str, &str> {
        let mut out = BTreeMap::new();
        for record in self.files.values() {
            if let Some(name) = record.component_name() {
                out.entry(name).or_insert(record.path.as_str());
            }
        }
        out
    }

    /// Indented directory listing of every path.
    pub fn file_tree(&self) -> String {
        let mut out = String::new();
        let mut open_dirs: Vec<&str> = Vec::new();
        for path in self.files.keys() {
            let trimmed = path.trim_start_matches('/');
            let segments: Vec<&str> = trimmed.split('/').collect();
            let (dirs, name) = segments.split_at(segments.len() - 1);
            let common = open_dirs
                .iter()
                .zip(dirs.iter())
                .take_while(|(a, b)| a == b)
                .count();
            open_dirs.truncate(common);
            for dir in &dirs[common..] {
                out.push_str(&"  ".repeat(open_dirs.len()));
                out.push_str(dir);
                out.push_str("/\n");
                open_dirs.push(dir);
            }
            out.push_str(&"  ".repeat(open_dirs.len()));
            out.push_str(name[0]);
            out.push('\n');
        }
        out
    }
}
