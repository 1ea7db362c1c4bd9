use super::domain::{
    CommandAction, FormatFilesPayload, LocalContextPayload, RenderHistoryPayload,
    SearchPlanPayload, SelectFilesPayload, SelectTargetPayload, TargetEditPayload, Turn,
    ValidateManifestPayload,
};
use crate::config::EngineConfig;
use anyhow::{bail, Context, Result};
use context_graph::{validate_component_tree, ContextAssembler};
use context_memory::{render_summary_prompt, ConversationState, MemoryConfig};
use context_prompt::{format_files_for_ai, Classification, EditTargeter, IntentClassifier};
use context_protocol::{Manifest, SearchPlan};
use context_search::{
    format_search_results_for_ai, format_target_location, select_target_file, SearchExecutor,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub struct Services {
    config: EngineConfig,
    targeter: EditTargeter,
}

impl Services {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            targeter: EditTargeter::new(config.context.clone(), config.search.clone()),
            config,
        }
    }

    pub fn route(&self, action: CommandAction, payload: Value) -> Result<Value> {
        match action {
            CommandAction::SelectFiles => self.select_files(parse_payload(action, payload)?),
            CommandAction::ExecuteSearchPlan => {
                self.execute_search_plan(parse_payload(action, payload)?)
            }
            CommandAction::SelectTarget => select_target(parse_payload(action, payload)?),
            CommandAction::TargetEdit => self.target_edit(parse_payload(action, payload)?),
            CommandAction::FormatFiles => self.format_files(parse_payload(action, payload)?),
            CommandAction::BuildLocalContext => {
                self.build_local_context(parse_payload(action, payload)?)
            }
            CommandAction::RenderHistory => self.render_history(parse_payload(action, payload)?),
            CommandAction::ValidateManifest => validate_manifest(parse_payload(action, payload)?),
            CommandAction::Schema => Ok(context_protocol::boundary_schemas()),
        }
    }

    fn select_files(&self, payload: SelectFilesPayload) -> Result<Value> {
        let manifest = parse_manifest(payload.manifest)?;
        let history = replay_history(&payload.turns, &self.config.memory);
        let selection =
            self.targeter
                .select_files_for_edit(&payload.prompt, &manifest, history.as_deref());

        let mut data = serde_json::to_value(&selection)?;
        if payload.include_files {
            let embedded =
                self.embed_files(&manifest, &selection.primary_files, &selection.context_files);
            data["files"] = Value::String(embedded.text);
        }
        Ok(data)
    }

    fn execute_search_plan(&self, payload: SearchPlanPayload) -> Result<Value> {
        let plan = SearchPlan::from_json_value(payload.plan)?;
        let executor = SearchExecutor::new(self.config.search.clone());
        let execution = match (payload.files, payload.manifest) {
            (Some(files), _) => executor.execute(&plan, files),
            (None, Some(manifest)) => {
                let manifest = parse_manifest(manifest)?;
                executor.execute(&plan, manifest_contents(&manifest))
            }
            (None, None) => bail!("execute_search_plan needs either files or a manifest"),
        };

        let formatted = format_search_results_for_ai(&execution.results);
        let mut data = serde_json::to_value(&execution)?;
        data["formatted"] = Value::String(formatted);
        Ok(data)
    }

    fn target_edit(&self, payload: TargetEditPayload) -> Result<Value> {
        let manifest = parse_manifest(payload.manifest)?;
        let history = replay_history(&payload.turns, &self.config.memory);

        let outcome = match payload.classification {
            Some(raw) => {
                let external = move |_: &str, _: &Manifest| -> Result<Classification> {
                    Ok(Classification::from_json_value(raw.clone())?)
                };
                self.run_targeting(&payload.prompt, &manifest, &external, history.as_deref())
            }
            None => self.run_targeting(
                &payload.prompt,
                &manifest,
                self.targeter.heuristic(),
                history.as_deref(),
            ),
        };

        let mut data = serde_json::to_value(&outcome)?;
        if payload.include_files {
            let embedded = self.embed_files(
                &manifest,
                &outcome.selection.primary_files,
                &outcome.selection.context_files,
            );
            data["files"] = Value::String(embedded.text);
        }
        Ok(data)
    }

    fn run_targeting<C: IntentClassifier + ?Sized>(
        &self,
        prompt: &str,
        manifest: &Manifest,
        classifier: &C,
        history: Option<&str>,
    ) -> context_prompt::TargetedEdit {
        self.targeter
            .target_edit(prompt, manifest, classifier, manifest_contents(manifest), history)
    }

    fn format_files(&self, payload: FormatFilesPayload) -> Result<Value> {
        let manifest = parse_manifest(payload.manifest)?;
        let embedded = self.embed_files(&manifest, &payload.primary_files, &payload.context_files);
        Ok(json!({
            "text": embedded.text,
            "skipped": embedded.skipped,
        }))
    }

    fn build_local_context(&self, payload: LocalContextPayload) -> Result<Value> {
        let manifest = parse_manifest(payload.manifest)?;
        let context =
            ContextAssembler::new(&manifest, &self.config.context).assemble(&payload.primary_files);
        Ok(json!({
            "context_files": context.paths(),
            "entries": context.entries,
        }))
    }

    fn render_history(&self, payload: RenderHistoryPayload) -> Result<Value> {
        let memory = &self.config.memory;
        let mut state = ConversationState::new();
        if let Some(topic) = payload.topic {
            state.set_topic(topic);
        }
        for turn in &payload.turns {
            state.append(&turn.user, turn.result.as_ref(), memory);
        }
        let summary = render_summary_prompt(&state, memory);
        Ok(json!({
            "summary": summary,
            "state": state,
        }))
    }

    fn embed_files(&self, manifest: &Manifest, primary: &[String], context: &[String]) -> EmbeddedFiles {
        let mut skipped = Vec::new();
        let primary = lookup_contents(manifest, primary, &mut skipped);
        let context = lookup_contents(manifest, context, &mut skipped);
        EmbeddedFiles {
            text: format_files_for_ai(&primary, &context, &self.config.prompt),
            skipped,
        }
    }
}

fn select_target(payload: SelectTargetPayload) -> Result<Value> {
    let target = select_target_file(&payload.results, payload.edit_type);
    Ok(json!({
        "target": target,
        "location": target.map(format_target_location),
    }))
}

fn validate_manifest(payload: ValidateManifestPayload) -> Result<Value> {
    let manifest = parse_manifest(payload.manifest)?;
    validate_component_tree(&manifest.component_tree)?;

    let mut warnings = Vec::new();
    if let Some(entry) = manifest.entry_point.as_deref() {
        if !manifest.contains(entry) {
            warnings.push(format!("entry point {entry} is not in the manifest"));
        }
    }
    for (route, path) in &manifest.routes {
        if !manifest.contains(path) {
            warnings.push(format!("route {route} points at missing file {path}"));
        }
    }
    Ok(json!({
        "files": manifest.files.len(),
        "components": manifest.component_files().len(),
        "component_tree_nodes": manifest.component_tree.len(),
        "warnings": warnings,
    }))
}

fn parse_payload<T: DeserializeOwned>(action: CommandAction, payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .with_context(|| format!("Invalid payload for {}", action.as_str()))
}

fn parse_manifest(raw: Value) -> Result<Manifest> {
    Ok(Manifest::from_json_str(&raw.to_string())?)
}

fn manifest_contents(manifest: &Manifest) -> impl Iterator<Item = (&str, &str)> + '_ {
    manifest
        .files
        .iter()
        .map(|(path, record)| (path.as_str(), record.content.as_str()))
}

struct EmbeddedFiles {
    text: String,
    /// Requested paths absent from the manifest
    skipped: Vec<String>,
}

fn lookup_contents<'a>(
    manifest: &'a Manifest,
    paths: &'a [String],
    skipped: &mut Vec<String>,
) -> Vec<(&'a str, &'a str)> {
    let mut found = Vec::with_capacity(paths.len());
    for path in paths {
        match manifest.get_file(path) {
            Some(record) => found.push((path.as_str(), record.content.as_str())),
            None => {
                log::debug!("{path} is not in the manifest; skipping");
                skipped.push(path.clone());
            }
        }
    }
    found
}

/// Replay `turns` into a fresh conversation and render its digest.
fn replay_history(turns: &[Turn], config: &MemoryConfig) -> Option<String> {
    if turns.is_empty() {
        return None;
    }
    let mut state = ConversationState::new();
    for turn in turns {
        state.append(&turn.user, turn.result.as_ref(), config);
    }
    Some(render_summary_prompt(&state, config))
}
