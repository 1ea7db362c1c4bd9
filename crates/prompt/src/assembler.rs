use crate::guidance::{edit_examples_prompt, COMPONENT_PATTERN_GUIDANCE};
use crate::instructions::instructions_for;
use context_graph::ComponentGraph;
use context_protocol::{EditCategory, EditIntent, Manifest};
use context_search::{format_target_location, SearchResult};
use std::fmt::Write;

/// Inputs of one system prompt.
pub struct PromptSections<'a> {
    /// Verbatim user request
    pub request: &'a str,
    pub intent: &'a EditIntent,
    pub manifest: &'a Manifest,
    pub graph: &'a ComponentGraph,
    pub primary_files: &'a [String],
    pub context_files: &'a [String],
    /// Exact location from the precise path
    pub target: Option<&'a SearchResult>,
    /// Rendered conversation digest
    pub history: Option<&'a str>,
}

fn annotated(path: &str, manifest: &Manifest) -> String {
    match manifest.component_name_of(path) {
        Some(name) => format!("- {path} (component: {name})"),
        None => format!("- {path}"),
    }
}

fn names(nodes: Vec<&context_graph::ComponentNode>) -> String {
    if nodes.is_empty() {
        "none".to_string()
    } else {
        nodes.iter().map(|node| node.name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

fn structure_overview(manifest: &Manifest) -> String {
    let mut out = String::from("## PROJECT STRUCTURE\n");
    out.push_str("```\n");
    out.push_str(&manifest.file_tree());
    out.push_str("```\n");

    let components = manifest.component_files();
    if !components.is_empty() {
        out.push_str("\nComponents:\n");
        for (name, path) in components {
            let _ = writeln!(out, "- {name} -> {path}");
        }
    }
    if let Some(entry) = &manifest.entry_point {
        let _ = writeln!(out, "\nEntry point: {entry}");
    }
    if !manifest.routes.is_empty() {
        out.push_str("\nRoutes:\n");
        for (route, path) in &manifest.routes {
            let _ = writeln!(out, "- {route} -> {path}");
        }
    }
    out
}

fn relationships(sections: &PromptSections<'_>) -> Option<String> {
    let mut out = String::from("## COMPONENT RELATIONSHIPS\n");
    let mut any = false;
    for path in sections.primary_files {
        let Some(name) = sections.manifest.component_name_of(path) else {
            continue;
        };
        any = true;
        let _ = writeln!(out, "{name} ({path}):");
        let _ = writeln!(out, "- imports: {}", names(sections.graph.imports_of(name)));
        let _ = writeln!(out, "- imported by: {}", names(sections.graph.importers_of(name)));
        let _ = writeln!(out, "- renders: {}", names(sections.graph.renders_of(name)));
    }
    any.then_some(out)
}

/// Assemble the system prompt in fixed section order.
pub fn build_system_prompt(sections: &PromptSections<'_>) -> String {
    let intent = sections.intent;
    let mut parts: Vec<String> = Vec::new();

    if let Some(examples) = edit_examples_prompt(intent.category) {
        parts.push(examples);
    }

    parts.push(format!(
        "## EDIT INTENT\nType: {}\nDescription: {}\nConfidence: {}%\nUser request: \"{}\"\n",
        intent.category,
        intent.description,
        intent.confidence_percent(),
        sections.request
    ));

    parts.push(structure_overview(sections.manifest));
    parts.push(COMPONENT_PATTERN_GUIDANCE.to_string());

    let mut primary = String::from("## FILES TO EDIT\n");
    if sections.primary_files.is_empty() {
        primary.push_str("(none selected)\n");
    }
    for path in sections.primary_files {
        primary.push_str(&annotated(path, sections.manifest));
        primary.push('\n');
    }
    parts.push(primary);

    if !sections.context_files.is_empty() {
        let mut context = String::from("## CONTEXT FILES (reference only)\n");
        for path in sections.context_files {
            context.push_str(&annotated(path, sections.manifest));
            context.push('\n');
        }
        parts.push(context);
    }

    if let Some(target) = sections.target {
        parts.push(format_target_location(target));
    }

    parts.push(format!("{}\n", instructions_for(intent.category)));

    if matches!(
        intent.category,
        EditCategory::UpdateComponent | EditCategory::AddFeature
    ) {
        if let Some(block) = relationships(sections) {
            parts.push(block);
        }
    }

    if let Some(history) = sections.history.filter(|h| !h.trim().is_empty()) {
        parts.push(history.to_string());
    }

    parts.join("\n")
}
