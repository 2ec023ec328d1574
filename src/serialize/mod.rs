//! Story serialization.
//!
//! Two external forms: the JSON story file (canonical, distributable) and
//! sectioned text (human-editable, lossy for fractional-free typing only).

mod json;
mod text;

pub use json::{from_json_tree, from_story_json, to_json_tree, to_story_json, to_story_json_pretty};
pub use text::{from_sectioned_text, from_sectioned_text_with, to_sectioned_text};

/// Errors produced while serializing a story.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JCS canonicalization error: {0}")]
    Jcs(String),
}
