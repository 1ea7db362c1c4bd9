use crate::builder::GraphBuilder;
use crate::config::ContextConfig;
use crate::resolve::resolve_import_path;
use crate::types::ComponentGraph;
use context_protocol::paths::{file_name, normalize_path};
use context_protocol::Manifest;
use serde::Serialize;
use std::collections::HashSet;

/// Why a file landed in the local context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextReason {
    EntryComponent,
    ThemeConfig,
    GlobalStylesheet,
    /// Resolved local import of a primary file
    Import,
    /// Component importing a primary component
    Consumer,
    /// Component a primary component imports
    Dependency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    pub path: String,
    pub reason: ContextReason,
}

/// Ordered, duplicate-free local context of a set of primary files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalContext {
    pub entries: Vec<ContextEntry>,
}

impl LocalContext {
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reason_of(&self, path: &str) -> Option<ContextReason> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.reason)
    }
}

/// Builds the single-hop local context around files to edit.
///
/// The closure is depth 1 from each primary file: essential files, resolved
/// imports, and the consumers/dependencies of each primary component. It is
/// never transitive.
pub struct ContextAssembler<'a> {
    manifest: &'a Manifest,
    config: &'a ContextConfig,
    graph: ComponentGraph,
}

struct Collector<'p> {
    primary: &'p HashSet<String>,
    seen: HashSet<String>,
    entries: Vec<ContextEntry>,
}

impl Collector<'_> {
    fn push(&mut self, path: &str, reason: ContextReason) {
        if self.primary.contains(path) || self.seen.contains(path) {
            return;
        }
        self.seen.insert(path.to_string());
        self.entries.push(ContextEntry {
            path: path.to_string(),
            reason,
        });
    }
}

impl<'a> ContextAssembler<'a> {
    pub fn new(manifest: &'a Manifest, config: &'a ContextConfig) -> Self {
        let graph = GraphBuilder::new(config).build(manifest);
        Self {
            manifest,
            config,
            graph,
        }
    }

    pub fn graph(&self) -> &ComponentGraph {
        &self.graph
    }

    /// First manifest path (lexical order) whose file name is in `names`.
    fn find_essential(&self, names: &[String]) -> Option<&'a str> {
        self.manifest
            .list_paths()
            .find(|path| names.iter().any(|name| name == file_name(path)))
    }

    pub fn entry_component(&self) -> Option<&'a str> {
        self.find_essential(&self.config.entry_file_names)
    }

    pub fn theme_config(&self) -> Option<&'a str> {
        self.find_essential(&self.config.theme_file_names)
    }

    pub fn global_stylesheet(&self) -> Option<&'a str> {
        self.find_essential(&self.config.stylesheet_file_names)
    }

    /// Local context for `primary_files`. Never contains a primary file.
    pub fn assemble(&self, primary_files: &[String]) -> LocalContext {
        let primary_order: Vec<String> = primary_files.iter().map(|p| normalize_path(p)).collect();
        let primary: HashSet<String> = primary_order.iter().cloned().collect();
        let mut collector = Collector {
            primary: &primary,
            seen: HashSet::new(),
            entries: Vec::new(),
        };

        // 1. Essential files
        if let Some(path) = self.entry_component() {
            collector.push(path, ContextReason::EntryComponent);
        }
        if let Some(path) = self.theme_config() {
            collector.push(path, ContextReason::ThemeConfig);
        }
        if let Some(path) = self.global_stylesheet() {
            collector.push(path, ContextReason::GlobalStylesheet);
        }

        // 2. Resolved imports of each primary file
        for path in &primary_order {
            let Some(record) = self.manifest.get_file(path) else {
                log::debug!("Primary file {path} not in manifest; skipping its imports");
                continue;
            };
            for import in &record.imports {
                if let Some(resolved) =
                    resolve_import_path(&record.path, &import.source, self.manifest, self.config)
                {
                    collector.push(&resolved, ContextReason::Import);
                }
            }
        }

        // 3. Component graph neighbours of each primary component
        for path in &primary_order {
            let Some(name) = self.manifest.component_name_of(path) else {
                continue;
            };
            for consumer in self.graph.importers_of(name) {
                if let Some(file) = consumer.file.as_deref() {
                    collector.push(file, ContextReason::Consumer);
                }
            }
            for dep in self.graph.imports_of(name) {
                if let Some(file) = dep.file.as_deref() {
                    collector.push(file, ContextReason::Dependency);
                }
            }
        }

        log::debug!(
            "Local context for {} primary file(s): {} file(s)",
            primary.len(),
            collector.entries.len()
        );

        LocalContext {
            entries: collector.entries,
        }
    }
}

/// Convenience wrapper returning only the ordered paths.
pub fn build_local_context(
    primary_files: &[String],
    manifest: &Manifest,
    config: &ContextConfig,
) -> Vec<String> {
    ContextAssembler::new(manifest, config)
        .assemble(primary_files)
        .paths()
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_protocol::{ComponentInfo, ComponentTreeNode, FileRecord, ImportSpec};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn component(path: &str, name: &str, imports: &[&str]) -> FileRecord {
        imports.iter().fold(
            FileRecord::new(path, "").with_component(ComponentInfo::named(name)),
            |record, source| record.with_import(ImportSpec::local(*source)),
        )
    }

    fn app_manifest() -> Manifest {
        Manifest::new([
            component("src/App.jsx", "App", &["./components/Header", "./components/Footer"]),
            component("src/components/Header.jsx", "Header", &["./Nav", "./Header.css"]),
            component("src/components/Footer.jsx", "Footer", &[]),
            component("src/components/Nav.jsx", "Nav", &["./Header"]),
            FileRecord::new("src/components/Header.css", ".header {}"),
            FileRecord::new("src/index.css", "@tailwind base;"),
            FileRecord::new("tailwind.config.js", "module.exports = {}"),
        ])
        .with_entry_point("src/main.jsx")
    }

    #[test]
    fn essential_files_come_first_then_graph_neighbours() {
        let manifest = app_manifest();
        let config = ContextConfig::default();
        let context = ContextAssembler::new(&manifest, &config)
            .assemble(&["src/components/Header.jsx".to_string()]);

        assert_eq!(
            context.paths(),
            vec![
                "src/App.jsx",
                "tailwind.config.js",
                "src/index.css",
                "src/components/Nav.jsx",
                "src/components/Header.css",
            ]
        );
        assert_eq!(context.reason_of("src/App.jsx"), Some(ContextReason::EntryComponent));
        assert_eq!(context.reason_of("src/components/Nav.jsx"), Some(ContextReason::Import));
    }

    #[test]
    fn primary_entry_component_is_not_repeated() {
        let manifest = app_manifest();
        let config = ContextConfig::default();
        let paths = build_local_context(&["src/App.jsx".to_string()], &manifest, &config);

        assert!(!paths.contains(&"src/App.jsx".to_string()));
        assert_eq!(
            paths,
            vec![
                "tailwind.config.js",
                "src/index.css",
                "src/components/Header.jsx",
                "src/components/Footer.jsx",
            ]
        );
    }

    #[test]
    fn closure_is_single_hop() {
        let manifest = app_manifest();
        let config = ContextConfig::default();
        let paths = build_local_context(&["src/components/Footer.jsx".to_string()], &manifest, &config);

        // App is essential; Header (App's other import) is two hops away.
        assert!(!paths.contains(&"src/components/Header.jsx".to_string()));
        assert!(!paths.contains(&"src/components/Nav.jsx".to_string()));
    }

    #[test]
    fn unknown_primary_files_are_skipped() {
        let manifest = app_manifest();
        let config = ContextConfig::default();
        let paths = build_local_context(&["src/Missing.jsx".to_string()], &manifest, &config);
        assert_eq!(paths, vec!["src/App.jsx", "tailwind.config.js", "src/index.css"]);
    }

    #[test]
    fn tree_only_components_still_get_consumers() {
        let mut tree = BTreeMap::new();
        tree.insert(
            "Card".to_string(),
            ComponentTreeNode {
                file: Some("src/Card.jsx".to_string()),
                imported_by: vec!["Grid".to_string()],
                ..Default::default()
            },
        );
        tree.insert(
            "Grid".to_string(),
            ComponentTreeNode {
                file: Some("src/Grid.jsx".to_string()),
                imports: vec!["Card".to_string()],
                ..Default::default()
            },
        );
        let manifest = Manifest::new([
            FileRecord::new("src/Card.jsx", ""),
            FileRecord::new("src/Grid.jsx", ""),
        ])
        .with_component_tree(tree);
        let config = ContextConfig::default();
        let context = ContextAssembler::new(&manifest, &config).assemble(&["src/Card.jsx".to_string()]);

        assert_eq!(context.reason_of("src/Grid.jsx"), Some(ContextReason::Consumer));
    }

    #[test]
    fn consumers_are_included_for_cycles() {
        let manifest = app_manifest();
        let config = ContextConfig::default();
        let context = ContextAssembler::new(&manifest, &config)
            .assemble(&["src/components/Nav.jsx".to_string()]);

        assert_eq!(
            context.reason_of("src/components/Header.jsx"),
            Some(ContextReason::Import)
        );
        assert_eq!(context.entries.iter().filter(|e| e.path == "src/components/Header.jsx").count(), 1);
    }
}
