//! Plain-text renderings of search results for prompt injection.

use crate::executor::SearchResult;
use crate::select::group_by_file;
use std::fmt::Write;

fn push_numbered(out: &mut String, start: usize, lines: &[String], marker: &str) {
    for (offset, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "{marker} {:>4} | {line}", start + offset);
    }
}

fn push_snippet(out: &mut String, result: &SearchResult) {
    let first = result.line_number.saturating_sub(result.context_before.len());
    push_numbered(out, first, &result.context_before, " ");
    let _ = writeln!(out, "> {:>4} | {}", result.line_number, result.line_content);
    push_numbered(out, result.line_number + 1, &result.context_after, " ");
}

/// Located lines grouped per file, each with its surrounding lines.
pub fn format_search_results_for_ai(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No matching code locations were found.\n".to_string();
    }

    let mut out = String::from("## SEARCH RESULTS\n\n");
    for (path, group) in group_by_file(results) {
        let _ = writeln!(out, "### {path} ({} match(es))", group.len());
        for result in group {
            let _ = writeln!(
                out,
                "Line {} matched `{}` (score {:.2}, {} confidence)",
                result.line_number,
                result.matched_by.as_str(),
                result.score,
                result.confidence.as_str()
            );
            out.push_str("```\n");
            push_snippet(&mut out, result);
            out.push_str("```\n");
        }
        out.push('\n');
    }
    out
}

/// The exact location block handed to the model for a surgical edit.
pub fn format_target_location(target: &SearchResult) -> String {
    let mut out = String::from("## EXACT EDIT LOCATION\n\n");
    let _ = writeln!(out, "File: {}", target.file_path);
    let _ = writeln!(out, "Line: {}", target.line_number);
    let _ = writeln!(out, "Matched: `{}`", target.matched_by.as_str());
    out.push_str("```\n");
    push_snippet(&mut out, target);
    out.push_str("```\n");
    out.push_str(
        "Change only the code at this location. Keep every other line of the file exactly as it is.\n",
    );
    out
}
