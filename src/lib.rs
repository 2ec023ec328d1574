//! Adventure Prompt - story compiler
//!
//! This crate compiles human-editable sectioned text sources into the
//! Adventure Prompt story file: a JSON object graph of rooms, exits, actors
//! and things, checked for dangling references before it is written.

pub mod merge;
pub mod pipeline;
pub mod sectioned;
pub mod serialize;
pub mod settings;
pub mod stats;
pub mod template;

pub use adv_model::{GameDocument, GameObject, Lock, Sigil, Value};
pub use adv_validator::{validate, Diagnostic, DiagnosticKind, Severity, ValidationReport};
pub use merge::{merge, merge_all};
pub use pipeline::{compile, CompileOptions, CompileOutcome, OutputMode, PipelineError};
pub use sectioned::{SectionedDocument, SectionedError};
pub use serialize::{from_story_json, to_story_json};
pub use settings::Settings;
pub use stats::StoryStats;
pub use template::{bundle, BundleError};
