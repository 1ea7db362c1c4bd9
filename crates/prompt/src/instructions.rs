//! Per-category instruction blocks appended to the system prompt.

use context_protocol::EditCategory;

const UPDATE_COMPONENT: &str = "## INSTRUCTIONS: SURGICAL EDIT
You are making a targeted change to an existing component.
- Change ONLY what the request asks for.
- Return the COMPLETE file, with every unrelated line preserved exactly.
- Do not rename, reorder, reformat or \"improve\" anything else.
- Keep existing imports, exports, props and styling untouched unless the request names them.
- Never return partial files, placeholders or \"rest of code\" comments.";

const ADD_FEATURE: &str = "## INSTRUCTIONS: ADD FEATURE
You are adding new functionality.
- Create new component files for new UI; keep each component focused.
- Wire every new component into the existing tree: add the import and render it where the request implies.
- Return every file you create and every existing file you modify, complete.
- Match the project's existing naming, folder layout and styling approach.
- Do not touch files unrelated to the feature.";

const FIX_ISSUE: &str = "## INSTRUCTIONS: FIX ISSUE
You are fixing a defect.
- Identify the root cause in the files to edit before changing anything.
- Apply the smallest change that fixes it.
- Return the complete fixed file(s); leave working code as it is.
- Do not refactor or restyle while fixing.";

const UPDATE_STYLE: &str = "## INSTRUCTIONS: STYLE CHANGE
You are changing presentation only.
- Change ONLY the classes or style values the request targets.
- If one class must change, replace that single class and leave the rest of the className intact.
- Do not alter markup structure, text, logic or other elements' styles.
- Return the complete file with the style change applied.";

const REFACTOR: &str = "## INSTRUCTIONS: REFACTOR
You are restructuring code without changing behaviour.
- Preserve the rendered output and all public props and exports.
- Update every import that points at moved or renamed code.
- Return every file you touch, complete.";

const FULL_REBUILD: &str = "## INSTRUCTIONS: FULL REBUILD
You are regenerating the application.
- Produce a complete, working application for the request.
- Keep the entry component and configuration files valid for the existing toolchain.
- Return every file of the new application, complete.";

const ADD_DEPENDENCY: &str = "## INSTRUCTIONS: ADD DEPENDENCY
You are adding a package.
- Name each package to install explicitly.
- Import it only where it is used and show that usage.
- Return the complete files that use the package.
- Do not change unrelated code.";

const REMOVE_ELEMENT: &str = "## INSTRUCTIONS: REMOVE ELEMENT
You are removing something.
- Remove ONLY the element the request names.
- Clean up imports, state and handlers used solely by the removed element.
- Return the complete file with everything else preserved exactly.";

/// Instruction block for `category`.
pub fn instructions_for(category: EditCategory) -> &'static str {
    match category {
        EditCategory::UpdateComponent => UPDATE_COMPONENT,
        EditCategory::AddFeature => ADD_FEATURE,
        EditCategory::FixIssue => FIX_ISSUE,
        EditCategory::UpdateStyle => UPDATE_STYLE,
        EditCategory::Refactor => REFACTOR,
        EditCategory::FullRebuild => FULL_REBUILD,
        EditCategory::AddDependency => ADD_DEPENDENCY,
        EditCategory::RemoveElement => REMOVE_ELEMENT,
    }
}
