//! # Context Graph
//!
//! Project structure analysis for edit targeting: which files sit next to
//! the files being edited.
//!
//! ## Architecture
//!
//! ```text
//! Manifest (files, imports, component tree)
//!     │
//!     ├──> Import resolution
//!     │      └─ relative specifier -> concrete project path
//!     │
//!     ├──> Component Graph (petgraph)
//!     │      ├─ Nodes: components (name, backing file)
//!     │      └─ Edges: imports, renders
//!     │
//!     └──> Context Assembler
//!            ├─ Essential files (entry component, theme, stylesheet)
//!            ├─ Resolved imports of each primary file
//!            └─ Consumers / dependencies of each primary component
//! ```

mod assembler;
mod builder;
mod config;
mod error;
mod graph;
mod resolve;
mod types;

pub use assembler::{build_local_context, ContextAssembler, ContextEntry, ContextReason, LocalContext};
pub use builder::{derive_component_tree, validate_component_tree, GraphBuilder};
pub use config::ContextConfig;
pub use error::{GraphError, Result};
pub use resolve::{is_relative_specifier, resolve_import_path, PathLookup};
pub use types::{ComponentEdge, ComponentGraph, ComponentNode, RelationshipType};
