use crate::types::{ComponentGraph, ComponentNode, RelationshipType};
use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

impl ComponentGraph {
    /// Neighbours over one relationship, in edge insertion order.
    fn neighbors(
        &self,
        name: &str,
        relationship: RelationshipType,
        direction: Direction,
    ) -> Vec<&ComponentNode> {
        let Some(idx) = self.find_node(name) else {
            return Vec::new();
        };

        let mut edges: Vec<(EdgeIndex, _)> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|edge| edge.weight().relationship == relationship)
            .map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);

        edges
            .into_iter()
            .filter_map(|(_, other)| self.get_node(other))
            .collect()
    }

    /// Components `name` imports (its dependencies).
    pub fn imports_of(&self, name: &str) -> Vec<&ComponentNode> {
        self.neighbors(name, RelationshipType::Imports, Direction::Outgoing)
    }

    /// Components importing `name` (its consumers).
    pub fn importers_of(&self, name: &str) -> Vec<&ComponentNode> {
        self.neighbors(name, RelationshipType::Imports, Direction::Incoming)
    }

    /// Child components `name` renders.
    pub fn renders_of(&self, name: &str) -> Vec<&ComponentNode> {
        self.neighbors(name, RelationshipType::Renders, Direction::Outgoing)
    }

    /// Backing file of a component, if known.
    pub fn file_of(&self, name: &str) -> Option<&str> {
        self.find_node(name)
            .and_then(|idx| self.get_node(idx))
            .and_then(|node| node.file.as_deref())
    }
}
