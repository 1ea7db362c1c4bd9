use crate::assembler::{build_system_prompt, PromptSections};
use crate::classifier::{Classification, HeuristicClassifier, IntentClassifier};
use context_graph::{ContextAssembler, ContextConfig};
use context_protocol::{EditIntent, Manifest};
use context_search::{select_target_file, SearchConfig, SearchExecution, SearchExecutor, SearchResult};
use serde::Serialize;

/// Files and system prompt for one edit request.
#[derive(Debug, Clone, Serialize)]
pub struct FileSelection {
    pub primary_files: Vec<String>,
    pub context_files: Vec<String>,
    pub system_prompt: String,
    pub edit_intent: EditIntent,
}

/// Why the precise path handed over to coarse selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    ClassifierFailed,
    NoSearchPlan,
    NoResults,
    BroadEdit,
    TargetNotInManifest,
}

/// Outcome of the precise path.
#[derive(Debug, Clone, Serialize)]
pub struct TargetedEdit {
    pub selection: FileSelection,
    /// Selected location, absent when degraded
    pub target: Option<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchExecution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<Degradation>,
}

/// Coarse and precise file selection over one configuration.
pub struct EditTargeter {
    context: ContextConfig,
    search: SearchConfig,
    heuristic: HeuristicClassifier,
}

impl EditTargeter {
    pub fn new(context: ContextConfig, search: SearchConfig) -> Self {
        Self {
            heuristic: HeuristicClassifier::new(context.clone()),
            context,
            search,
        }
    }

    pub fn heuristic(&self) -> &HeuristicClassifier {
        &self.heuristic
    }

    /// Coarse path: heuristic intent, its targets as primary files and their
    /// single-hop local context.
    pub fn select_files_for_edit(&self, prompt: &str, manifest: &Manifest, history: Option<&str>) -> FileSelection {
        let intent = self.heuristic.classify_intent(prompt, manifest);
        self.selection_for_intent(prompt, manifest, intent, history)
    }

    /// Build the selection for an already classified intent. An intent
    /// without targets edits the entry point.
    pub fn selection_for_intent(
        &self,
        prompt: &str,
        manifest: &Manifest,
        mut intent: EditIntent,
        history: Option<&str>,
    ) -> FileSelection {
        let assembler = ContextAssembler::new(manifest, &self.context);

        let mut primary: Vec<String> = Vec::new();
        for path in &intent.target_files {
            if !manifest.contains(path) {
                log::debug!("Intent target {path} is not in the manifest; skipping");
                continue;
            }
            if !primary.contains(path) {
                primary.push(path.clone());
            }
        }
        if primary.is_empty() {
            let entry = manifest
                .entry_point
                .as_deref()
                .filter(|path| manifest.contains(path))
                .or_else(|| assembler.entry_component());
            if let Some(entry) = entry {
                log::info!("No edit targets found; falling back to {entry}");
                primary.push(entry.to_string());
            }
        }
        intent.target_files = primary.clone();

        self.finish(prompt, manifest, &assembler, intent, primary, None, history)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        prompt: &str,
        manifest: &Manifest,
        assembler: &ContextAssembler<'_>,
        intent: EditIntent,
        primary: Vec<String>,
        target: Option<&SearchResult>,
        history: Option<&str>,
    ) -> FileSelection {
        let context = assembler.assemble(&primary).paths();
        let system_prompt = build_system_prompt(&PromptSections {
            request: prompt,
            intent: &intent,
            manifest,
            graph: assembler.graph(),
            primary_files: &primary,
            context_files: &context,
            target,
            history,
        });
        log::info!(
            "Selected {} file(s) to edit with {} context file(s) ({})",
            primary.len(),
            context.len(),
            intent.category
        );
        FileSelection {
            primary_files: primary,
            context_files: context,
            system_prompt,
            edit_intent: intent,
        }
    }

    fn degrade(
        &self,
        prompt: &str,
        manifest: &Manifest,
        reason: Degradation,
        search: Option<SearchExecution>,
        history: Option<&str>,
    ) -> TargetedEdit {
        log::info!("Precise targeting degraded ({reason:?}); using coarse selection");
        TargetedEdit {
            selection: self.select_files_for_edit(prompt, manifest, history),
            target: None,
            search,
            degraded: Some(reason),
        }
    }

    /// Precise path: classify, execute the search plan and pin the edit to
    /// one location. Every failure degrades to [`Self::select_files_for_edit`].
    pub fn target_edit<C, I, K, V>(
        &self,
        prompt: &str,
        manifest: &Manifest,
        classifier: &C,
        file_contents: I,
        history: Option<&str>,
    ) -> TargetedEdit
    where
        C: IntentClassifier + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let plan = match classifier.classify(prompt, manifest) {
            Ok(Classification::Plan(plan)) => plan,
            Ok(Classification::Intent(intent)) => {
                log::debug!("Classifier returned an edit intent; selecting whole files");
                return TargetedEdit {
                    selection: self.selection_for_intent(prompt, manifest, intent, history),
                    target: None,
                    search: None,
                    degraded: Some(Degradation::NoSearchPlan),
                };
            }
            Err(err) => {
                log::warn!("Intent classification failed: {err:#}");
                return self.degrade(prompt, manifest, Degradation::ClassifierFailed, None, history);
            }
        };

        let execution = SearchExecutor::new(self.search.clone()).execute(&plan, file_contents);
        if execution.results.is_empty() {
            return self.degrade(prompt, manifest, Degradation::NoResults, Some(execution), history);
        }
        let Some(target) = select_target_file(&execution.results, plan.edit_type).cloned() else {
            return self.degrade(prompt, manifest, Degradation::BroadEdit, Some(execution), history);
        };
        let target_path = context_protocol::paths::normalize_path(&target.file_path);
        if !manifest.contains(&target_path) {
            return self.degrade(
                prompt,
                manifest,
                Degradation::TargetNotInManifest,
                Some(execution),
                history,
            );
        }

        let mut intent = EditIntent::new(
            plan.edit_type,
            if plan.reasoning.trim().is_empty() {
                format!("{} at {}:{}", plan.edit_type, target_path, target.line_number)
            } else {
                plan.reasoning.clone()
            },
            target.score,
        )
        .with_targets([target_path.clone()]);
        intent.search_terms = plan.search_terms.clone();

        let assembler = ContextAssembler::new(manifest, &self.context);
        let selection = self.finish(
            prompt,
            manifest,
            &assembler,
            intent,
            vec![target_path],
            Some(&target),
            history,
        );
        TargetedEdit {
            selection,
            target: Some(target),
            search: Some(execution),
            degraded: None,
        }
    }
}

impl Default for EditTargeter {
    fn default() -> Self {
        Self::new(ContextConfig::default(), SearchConfig::default())
    }
}

/// Coarse selection with default configuration.
pub fn select_files_for_edit(prompt: &str, manifest: &Manifest) -> FileSelection {
    EditTargeter::default().select_files_for_edit(prompt, manifest, None)
}

/// Precise targeting with default configuration, searching the manifest's
/// own file contents.
pub fn target_edit<C>(prompt: &str, manifest: &Manifest, classifier: &C) -> TargetedEdit
where
    C: IntentClassifier + ?Sized,
{
    let contents = manifest
        .files
        .iter()
        .map(|(path, record)| (path.as_str(), record.content.as_str()));
    EditTargeter::default().target_edit(prompt, manifest, classifier, contents, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_protocol::{ComponentInfo, EditCategory, FileRecord, ImportSpec, SearchPlan};
    use pretty_assertions::assert_eq;

    fn manifest() -> Manifest {
        Manifest::new([
            FileRecord::new("src/App.jsx", "export default function App() {}")
                .with_component(ComponentInfo::named("App"))
                .with_import(ImportSpec::local("./Header")),
            FileRecord::new(
                "src/Header.jsx",
                "export default function Header() {\n  return <header className=\"bg-blue-500\">Hi</header>;\n}",
            )
            .with_component(ComponentInfo::named("Header")),
            FileRecord::new("src/index.css", "@tailwind base;"),
        ])
    }

    #[test]
    fn coarse_path_without_targets_uses_entry_component() {
        let selection = select_files_for_edit("Make it better", &manifest());
        assert_eq!(selection.primary_files, vec!["src/App.jsx"]);
        assert_eq!(selection.edit_intent.target_files, vec!["src/App.jsx"]);
        assert_eq!(selection.context_files, vec!["src/index.css", "src/Header.jsx"]);
    }

    #[test]
    fn declared_entry_point_wins_when_present() {
        let manifest = manifest().with_entry_point("src/index.css");
        let selection = select_files_for_edit("Make it better", &manifest);
        assert_eq!(selection.primary_files, vec!["src/index.css"]);
    }

    #[test]
    fn precise_path_pins_the_line() {
        let classifier = |_: &str, _: &Manifest| -> anyhow::Result<Classification> {
            Ok(Classification::Plan(
                SearchPlan::new(EditCategory::UpdateStyle).with_terms(["bg-blue-500"]),
            ))
        };
        let outcome = target_edit("make header red", &manifest(), &classifier);
        assert!(outcome.degraded.is_none());
        let target = outcome.target.unwrap();
        assert_eq!((target.file_path.as_str(), target.line_number), ("src/Header.jsx", 2));
        assert_eq!(outcome.selection.primary_files, vec!["src/Header.jsx"]);
        assert!(outcome.selection.system_prompt.contains("## EXACT EDIT LOCATION"));
        assert!(!outcome.selection.context_files.contains(&"src/Header.jsx".to_string()));
    }

    #[test]
    fn classifier_failure_degrades_to_coarse_path() {
        let classifier = |_: &str, _: &Manifest| -> anyhow::Result<Classification> {
            Err(anyhow::anyhow!("model timed out"))
        };
        let outcome = target_edit("change the header", &manifest(), &classifier);
        assert_eq!(outcome.degraded, Some(Degradation::ClassifierFailed));
        assert!(outcome.target.is_none());
        assert_eq!(outcome.selection.primary_files, vec!["src/Header.jsx"]);
    }

    #[test]
    fn empty_search_and_broad_plans_degrade() {
        let missing = |_: &str, _: &Manifest| -> anyhow::Result<Classification> {
            Ok(Classification::Plan(
                SearchPlan::new(EditCategory::UpdateComponent).with_terms(["not in any file"]),
            ))
        };
        let outcome = target_edit("change the header", &manifest(), &missing);
        assert_eq!(outcome.degraded, Some(Degradation::NoResults));

        let broad = |_: &str, _: &Manifest| -> anyhow::Result<Classification> {
            Ok(Classification::Plan(
                SearchPlan::new(EditCategory::Refactor).with_terms(["Header"]),
            ))
        };
        let outcome = target_edit("refactor header", &manifest(), &broad);
        assert_eq!(outcome.degraded, Some(Degradation::BroadEdit));
        assert!(outcome.search.is_some());
    }
}
