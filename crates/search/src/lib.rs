//! # Context Search
//!
//! Precise edit targeting: executes classifier search plans (literal terms and
//! regex patterns) over in-memory file contents, ranks the located lines and
//! selects a single surgical target for single-point edits.
//!
//! ## Flow
//!
//! ```text
//! SearchPlan + {path -> content}
//!   -> FileTypeFilter        (plan file types, else configured defaults)
//!   -> SearchExecutor        (per-line literal/regex scoring, fallback pass)
//!   -> select_target_file    (single-point categories only)
//! ```

mod config;
mod error;
mod executor;
mod filter;
mod format;
mod fuzzy;
mod scoring;
mod select;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use executor::{
    compare_results, execute_search_plan, MatchSource, SearchExecution, SearchExecutor,
    SearchResult,
};
pub use filter::FileTypeFilter;
pub use format::{format_search_results_for_ai, format_target_location};
pub use fuzzy::FuzzySearch;
pub use scoring::{literal_score, regex_score, Confidence, EXACT_LINE_SCORE};
pub use select::{group_by_file, select_target_file};
