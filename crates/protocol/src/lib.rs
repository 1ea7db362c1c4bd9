//! Boundary contracts of the edit-targeting engine: the project manifest
//! snapshot, the classifier's intent / search-plan output, and the small
//! path and character-budget helpers every other crate shares.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod budget;
mod error;
mod intent;
mod manifest;
pub mod paths;

pub use error::{ProtocolError, Result};
pub use intent::{EditCategory, EditIntent, SearchFallback, SearchPlan};
pub use manifest::{ComponentInfo, ComponentTreeNode, FileKind, FileRecord, ImportSpec, Manifest};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// JSON schemas of every type an external collaborator produces.
pub fn boundary_schemas() -> serde_json::Value {
    serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "manifest": schemars::schema_for!(Manifest),
        "edit_intent": schemars::schema_for!(EditIntent),
        "search_plan": schemars::schema_for!(SearchPlan),
    })
}
