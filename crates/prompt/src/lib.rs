//! # Context Prompt
//!
//! Turns a request into the files the model sees and the system prompt it
//! gets.
//!
//! Two paths lead there:
//!
//! - **coarse**: [`EditTargeter::select_files_for_edit`] classifies the
//!   request with the local [`HeuristicClassifier`], edits its target files
//!   and adds their single-hop local context;
//! - **precise**: [`EditTargeter::target_edit`] asks an [`IntentClassifier`]
//!   for a search plan, executes it and pins the edit to one line. Any
//!   failure on this path falls back to the coarse one.
//!
//! File bodies are embedded with [`format_files_for_ai`].

mod assembler;
mod classifier;
mod config;
mod error;
mod files;
mod guidance;
mod instructions;
mod targeting;

pub use assembler::{build_system_prompt, PromptSections};
pub use classifier::{Classification, HeuristicClassifier, IntentClassifier};
pub use config::PromptConfig;
pub use error::{PromptError, Result};
pub use files::format_files_for_ai;
pub use guidance::{edit_examples_prompt, COMPONENT_PATTERN_GUIDANCE};
pub use instructions::instructions_for;
pub use targeting::{
    select_files_for_edit, target_edit, Degradation, EditTargeter, FileSelection, TargetedEdit,
};
