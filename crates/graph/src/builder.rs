use crate::config::ContextConfig;
use crate::error::{GraphError, Result};
use crate::resolve::resolve_import_path;
use crate::types::{ComponentGraph, RelationshipType};
use context_protocol::{ComponentTreeNode, Manifest};
use std::collections::BTreeMap;

/// Build a [`ComponentGraph`] from a manifest snapshot.
pub struct GraphBuilder<'a> {
    config: &'a ContextConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a ContextConfig) -> Self {
        Self { config }
    }

    /// Build the graph from the manifest's component tree.
    ///
    /// A manifest without a tree gets one derived from its import edges.
    /// Both `imports` and `imported_by` lists contribute edges, so a fixture
    /// that lists an edge on one side only still yields a consistent graph.
    pub fn build(&self, manifest: &Manifest) -> ComponentGraph {
        let derived;
        let tree = if manifest.component_tree.is_empty() {
            derived = derive_component_tree(manifest, self.config);
            &derived
        } else {
            &manifest.component_tree
        };

        let mut graph = ComponentGraph::new();

        for record in manifest.files.values() {
            if let Some(name) = record.component_name() {
                graph.ensure_node(name, Some(&record.path));
            }
        }

        // Phase 1: declared dependencies
        for (name, node) in tree {
            let from = graph.ensure_node(name, manifest.component_path(name));
            for dep in &node.imports {
                let to = graph.ensure_node(dep, manifest.component_path(dep));
                graph.add_edge(from, to, RelationshipType::Imports);
            }
        }

        // Phase 2: consumers, for edges only listed on the imported side
        for (name, node) in tree {
            let to = graph.ensure_node(name, manifest.component_path(name));
            for consumer in &node.imported_by {
                let from = graph.ensure_node(consumer, manifest.component_path(consumer));
                graph.add_edge(from, to, RelationshipType::Imports);
            }
        }

        // Phase 3: render relationships
        for record in manifest.files.values() {
            let Some(component) = &record.component else {
                continue;
            };
            let from = graph.ensure_node(&component.name, Some(&record.path));
            for child in &component.child_components {
                let to = graph.ensure_node(child, manifest.component_path(child));
                graph.add_edge(from, to, RelationshipType::Renders);
            }
        }

        log::debug!(
            "Built component graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }
}

/// Derive a symmetric component tree from per-file local imports.
///
/// An edge A -> B exists when a file declaring component A has a relative
/// import that resolves to a file declaring component B.
pub fn derive_component_tree(
    manifest: &Manifest,
    config: &ContextConfig,
) -> BTreeMap<String, ComponentTreeNode> {
    let mut tree: BTreeMap<String, ComponentTreeNode> = BTreeMap::new();

    for record in manifest.files.values() {
        let Some(name) = record.component_name() else {
            continue;
        };
        tree.entry(name.to_string()).or_insert_with(|| ComponentTreeNode {
            file: Some(record.path.clone()),
            ..Default::default()
        });

        for import in &record.imports {
            let Some(target) = resolve_import_path(&record.path, &import.source, manifest, config)
            else {
                continue;
            };
            let Some(dep) = manifest.component_name_of(&target) else {
                continue;
            };

            let node = tree.entry(name.to_string()).or_default();
            if !node.imports.iter().any(|existing| existing == dep) {
                node.imports.push(dep.to_string());
            }

            let dep_node = tree.entry(dep.to_string()).or_insert_with(|| ComponentTreeNode {
                file: Some(target.clone()),
                ..Default::default()
            });
            if !dep_node.imported_by.iter().any(|existing| existing == name) {
                dep_node.imported_by.push(name.to_string());
            }
        }
    }

    tree
}

/// Check that `A in imports(B)` exactly when `B in imported_by(A)`.
pub fn validate_component_tree(tree: &BTreeMap<String, ComponentTreeNode>) -> Result<()> {
    for (name, node) in tree {
        for dep in &node.imports {
            let listed = tree
                .get(dep)
                .is_some_and(|dep_node| dep_node.imported_by.iter().any(|c| c == name));
            if !listed {
                return Err(GraphError::AsymmetricImport {
                    from: name.clone(),
                    to: dep.clone(),
                });
            }
        }
        for consumer in &node.imported_by {
            let listed = tree
                .get(consumer)
                .is_some_and(|consumer_node| consumer_node.imports.iter().any(|d| d == name));
            if !listed {
                return Err(GraphError::AsymmetricImportedBy {
                    from: consumer.clone(),
                    to: name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_protocol::{ComponentInfo, FileRecord, ImportSpec};
    use pretty_assertions::assert_eq;

    fn component(path: &str, name: &str, imports: &[&str]) -> FileRecord {
        let mut record = FileRecord::new(path, "").with_component(ComponentInfo::named(name));
        for source in imports {
            record = record.with_import(ImportSpec::local(*source));
        }
        record
    }

    fn sample_manifest() -> Manifest {
        Manifest::new([
            component("src/App.jsx", "App", &["./components/Header", "./components/Footer"])
                .with_import(ImportSpec::package("react")),
            component("src/components/Header.jsx", "Header", &["./Logo"]),
            component("src/components/Footer.jsx", "Footer", &[]),
            component("src/components/Logo.jsx", "Logo", &[]),
        ])
    }

    #[test]
    fn derives_symmetric_tree_from_imports() {
        let tree = derive_component_tree(&sample_manifest(), &ContextConfig::default());

        assert_eq!(tree["App"].imports, vec!["Header", "Footer"]);
        assert_eq!(tree["Header"].imported_by, vec!["App"]);
        assert_eq!(tree["Header"].imports, vec!["Logo"]);
        assert_eq!(tree["Logo"].imported_by, vec!["Header"]);
        validate_component_tree(&tree).unwrap();
    }

    #[test]
    fn builds_graph_from_derived_tree() {
        let config = ContextConfig::default();
        let graph = GraphBuilder::new(&config).build(&sample_manifest());

        assert_eq!(graph.node_count(), 4);
        let deps: Vec<_> = graph.imports_of("App").iter().map(|n| n.name.as_str()).collect();
        assert_eq!(deps, vec!["Header", "Footer"]);
        let consumers: Vec<_> = graph.importers_of("Logo").iter().map(|n| n.name.as_str()).collect();
        assert_eq!(consumers, vec!["Header"]);
        assert_eq!(graph.file_of("Footer"), Some("src/components/Footer.jsx"));
    }

    #[test]
    fn one_sided_edges_still_connect() {
        let mut tree = BTreeMap::new();
        tree.insert(
            "Card".to_string(),
            ComponentTreeNode {
                imported_by: vec!["Grid".to_string()],
                ..Default::default()
            },
        );
        let manifest = Manifest::new([
            component("src/Card.jsx", "Card", &[]),
            component("src/Grid.jsx", "Grid", &[]),
        ])
        .with_component_tree(tree.clone());

        assert_eq!(
            validate_component_tree(&tree),
            Err(GraphError::AsymmetricImportedBy {
                from: "Grid".to_string(),
                to: "Card".to_string()
            })
        );

        let config = ContextConfig::default();
        let graph = GraphBuilder::new(&config).build(&manifest);
        let deps: Vec<_> = graph.imports_of("Grid").iter().map(|n| n.name.as_str()).collect();
        assert_eq!(deps, vec!["Card"]);
    }

    #[test]
    fn cycles_are_permitted() {
        let manifest = Manifest::new([
            component("src/A.jsx", "A", &["./B"]),
            component("src/B.jsx", "B", &["./A"]),
        ]);
        let config = ContextConfig::default();
        let tree = derive_component_tree(&manifest, &config);
        validate_component_tree(&tree).unwrap();

        let graph = GraphBuilder::new(&config).build(&manifest);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.importers_of("A")[0].name, "B");
    }

    #[test]
    fn render_edges_come_from_child_components() {
        let mut app = component("src/App.jsx", "App", &[]);
        if let Some(info) = app.component.as_mut() {
            info.child_components = vec!["Hero".to_string(), "Hero".to_string()];
        }
        let manifest = Manifest::new([app, component("src/Hero.jsx", "Hero", &[])]);
        let config = ContextConfig::default();
        let graph = GraphBuilder::new(&config).build(&manifest);

        let rendered: Vec<_> = graph.renders_of("App").iter().map(|n| n.name.as_str()).collect();
        assert_eq!(rendered, vec!["Hero"]);
        assert!(graph.imports_of("App").is_empty());
    }
}
