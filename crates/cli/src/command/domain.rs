use context_memory::AiResult;
use context_protocol::{EditCategory, ErrorEnvelope};
use context_search::SearchResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    SelectFiles,
    ExecuteSearchPlan,
    SelectTarget,
    TargetEdit,
    FormatFiles,
    BuildLocalContext,
    RenderHistory,
    ValidateManifest,
    Schema,
}

impl CommandAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::SelectFiles => "select_files",
            CommandAction::ExecuteSearchPlan => "execute_search_plan",
            CommandAction::SelectTarget => "select_target",
            CommandAction::TargetEdit => "target_edit",
            CommandAction::FormatFiles => "format_files",
            CommandAction::BuildLocalContext => "build_local_context",
            CommandAction::RenderHistory => "render_history",
            CommandAction::ValidateManifest => "validate_manifest",
            CommandAction::Schema => "schema",
        }
    }
}

/// One replayed request with the model's result, if it produced one.
#[derive(Debug, Deserialize)]
pub struct Turn {
    pub user: String,
    #[serde(default)]
    pub result: Option<AiResult>,
}

#[derive(Debug, Deserialize)]
pub struct SelectFilesPayload {
    pub prompt: String,
    pub manifest: Value,
    #[serde(default)]
    pub turns: Vec<Turn>,
    /// Embed file bodies next to the system prompt
    #[serde(default)]
    pub include_files: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchPlanPayload {
    pub plan: Value,
    /// Contents to search; the manifest's own contents when absent
    #[serde(default)]
    pub files: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub manifest: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SelectTargetPayload {
    pub results: Vec<SearchResult>,
    pub edit_type: EditCategory,
}

#[derive(Debug, Deserialize)]
pub struct TargetEditPayload {
    pub prompt: String,
    pub manifest: Value,
    /// Classifier output (edit intent or search plan); the local heuristic
    /// classifier runs when absent
    #[serde(default)]
    pub classification: Option<Value>,
    #[serde(default)]
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub include_files: bool,
}

#[derive(Debug, Deserialize)]
pub struct FormatFilesPayload {
    pub manifest: Value,
    pub primary_files: Vec<String>,
    #[serde(default)]
    pub context_files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocalContextPayload {
    pub manifest: Value,
    pub primary_files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderHistoryPayload {
    #[serde(default)]
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateManifestPayload {
    pub manifest: Value,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn ok(data: Value, meta: ResponseMeta) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: None,
            error: None,
            data,
            meta,
        }
    }

    pub fn error(err: &anyhow::Error, meta: ResponseMeta) -> Self {
        let message = format!("{err:#}");
        let mut envelope = ErrorEnvelope::new(classify_error(err), message.clone());
        if let Some(hint) = hint_for(&envelope.code) {
            envelope = envelope.with_hint(hint);
        }
        Self {
            status: CommandStatus::Error,
            message: Some(message),
            error: Some(envelope),
            data: Value::Null,
            meta,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Stable error code for the failure at the root of `err`.
pub fn classify_error(err: &anyhow::Error) -> String {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<context_protocol::ProtocolError>() {
            return match err {
                context_protocol::ProtocolError::InvalidManifest(_) => "invalid_manifest",
                context_protocol::ProtocolError::InvalidPlan(_) => "invalid_plan",
                context_protocol::ProtocolError::UnknownCategory(_) => "unknown_category",
                context_protocol::ProtocolError::Json(_) => "invalid_json",
            }
            .to_string();
        }
        if let Some(err) = cause.downcast_ref::<context_graph::GraphError>() {
            return match err {
                context_graph::GraphError::InvalidConfig(_) => "invalid_config",
                _ => "asymmetric_component_tree",
            }
            .to_string();
        }
        if cause.downcast_ref::<context_prompt::PromptError>().is_some() {
            return "invalid_classification".to_string();
        }
        if cause.downcast_ref::<context_memory::MemoryError>().is_some() {
            return "memory".to_string();
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return "invalid_request".to_string();
        }
    }
    "internal".to_string()
}

fn hint_for(code: &str) -> Option<&'static str> {
    match code {
        "invalid_request" | "invalid_json" => {
            Some("Expected {\"action\": ..., \"payload\": {...}}; run the schema action for boundary types")
        }
        "invalid_manifest" => Some("Every files entry needs a non-empty path matching its key"),
        "asymmetric_component_tree" => {
            Some("Each imports edge must be mirrored by an imported_by entry on the other component")
        }
        "invalid_classification" => Some("Pass either an edit intent or a search plan object"),
        _ => None,
    }
}
