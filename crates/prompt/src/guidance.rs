//! Fixed guidance blocks: worked edit examples and component conventions.

use context_protocol::EditCategory;

const EXAMPLES_HEADER: &str = "## EDIT EXAMPLES\nFollow these patterns for this kind of request.\n";

const STYLE_EXAMPLE: &str = "Request: \"make the header background dark blue\"
Before: <header className=\"bg-blue-500 p-4 text-white\">
After:  <header className=\"bg-blue-900 p-4 text-white\">
Only the one class changed; padding and text color are untouched.";

const COMPONENT_EXAMPLE: &str = "Request: \"change the hero button text to Get Started\"
Before: <button className=\"btn-primary\">Start Deploying</button>
After:  <button className=\"btn-primary\">Get Started</button>
The rest of the file is returned exactly as it was.";

const REMOVE_EXAMPLE: &str = "Request: \"remove the newsletter signup from the footer\"
Delete the <NewsletterSignup /> element and its import; keep the rest of the footer.";

const FIX_EXAMPLE: &str = "Request: \"the menu button does nothing\"
Find the missing or broken onClick handler and fix it; do not restyle the button.";

const FEATURE_EXAMPLE: &str = "Request: \"add a pricing section\"
1. Create src/components/Pricing.jsx exporting a Pricing component.
2. Import Pricing in the page that should show it and render <Pricing />.";

const REFACTOR_EXAMPLE: &str = "Request: \"split the header navigation into its own component\"
Move the <nav> markup into src/components/Nav.jsx, import it in Header.jsx and render <Nav />.
Rendered output stays identical.";

const DEPENDENCY_EXAMPLE: &str = "Request: \"animate the cards with framer-motion\"
Name framer-motion as a new package, import motion where the cards render, and use <motion.div>.";

/// Worked examples for `category`; none for a full rebuild.
pub fn edit_examples_prompt(category: EditCategory) -> Option<String> {
    let example = match category {
        EditCategory::FullRebuild => return None,
        EditCategory::UpdateStyle => STYLE_EXAMPLE,
        EditCategory::UpdateComponent => COMPONENT_EXAMPLE,
        EditCategory::RemoveElement => REMOVE_EXAMPLE,
        EditCategory::FixIssue => FIX_EXAMPLE,
        EditCategory::AddFeature => FEATURE_EXAMPLE,
        EditCategory::Refactor => REFACTOR_EXAMPLE,
        EditCategory::AddDependency => DEPENDENCY_EXAMPLE,
    };
    Some(format!("{EXAMPLES_HEADER}{example}\n"))
}

pub const COMPONENT_PATTERN_GUIDANCE: &str = "## COMPONENT PATTERNS
- One component per file; the file name matches the component name.
- Functional components with hooks; default-export the component.
- Import children with relative paths (./Header, ../components/Card).
- Style with utility classes in className; keep global styles in the global stylesheet.
";
