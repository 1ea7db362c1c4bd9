use crate::config::PromptConfig;
use context_protocol::budget::truncate_chars;
use context_protocol::paths::language_tag;
use std::fmt::Write;

/// Embed file bodies for the model.
///
/// Files to edit are always included in full: the model must never return a
/// file it only saw part of. Context files are cut to
/// `context_file_max_chars` with a visible marker.
pub fn format_files_for_ai<P, C>(primary: &[(P, C)], context: &[(P, C)], config: &PromptConfig) -> String
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    let mut out = String::new();

    if !primary.is_empty() {
        out.push_str("## FILES TO EDIT (return each one complete)\n\n");
        for (path, content) in primary {
            push_file(&mut out, path.as_ref(), content.as_ref(), None);
        }
    }

    if !context.is_empty() {
        out.push_str("## CONTEXT FILES (reference only, do not modify)\n\n");
        for (path, content) in context {
            let (head, truncated) = truncate_chars(content.as_ref(), config.context_file_max_chars);
            let marker = truncated.then(|| {
                format!(
                    "... [truncated: showing first {} of {} characters]",
                    config.context_file_max_chars,
                    content.as_ref().chars().count()
                )
            });
            push_file(&mut out, path.as_ref(), head, marker.as_deref());
        }
    }

    out
}

fn push_file(out: &mut String, path: &str, body: &str, marker: Option<&str>) {
    let _ = writeln!(out, "### {path}");
    let _ = writeln!(out, "```{}", language_tag(path));
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    if let Some(marker) = marker {
        out.push_str(marker);
        out.push('\n');
    }
    out.push_str("```\n\n");
}
