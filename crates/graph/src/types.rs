use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Component in the project graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Component name (e.g., "Header")
    pub name: String,

    /// Backing file, when the manifest knows it
    pub file: Option<String>,
}

/// Type of relationship between components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    /// A imports B
    Imports,

    /// A renders B as a child element
    Renders,
}

/// Edge in component graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentEdge {
    pub relationship: RelationshipType,
}

/// Directed component graph. Cycles are allowed.
#[derive(Debug, Clone)]
pub struct ComponentGraph {
    pub graph: DiGraph<ComponentNode, ComponentEdge>,

    /// Component name -> NodeIndex mapping for fast lookup
    pub name_index: HashMap<String, NodeIndex>,
}

impl ComponentGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_index: HashMap::new(),
        }
    }

    /// Node for `name`, created on first use. A later call may fill in a
    /// missing backing file but never replaces a known one.
    pub fn ensure_node(&mut self, name: &str, file: Option<&str>) -> NodeIndex {
        if let Some(&idx) = self.name_index.get(name) {
            if let Some(file) = file {
                let node = &mut self.graph[idx];
                if node.file.is_none() {
                    node.file = Some(file.to_string());
                }
            }
            return idx;
        }

        let idx = self.graph.add_node(ComponentNode {
            name: name.to_string(),
            file: file.map(str::to_string),
        });
        self.name_index.insert(name.to_string(), idx);
        idx
    }

    /// Add an edge unless the same relationship already links the pair.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, relationship: RelationshipType) -> bool {
        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|edge| edge.weight().relationship == relationship);
        if exists {
            return false;
        }
        self.graph.add_edge(from, to, ComponentEdge { relationship });
        true
    }

    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    pub fn get_node(&self, idx: NodeIndex) -> Option<&ComponentNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for ComponentGraph {
    fn default() -> Self {
        Self::new()
    }
}
