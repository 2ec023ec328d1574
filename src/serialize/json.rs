//! JSON story files.

use adv_model::GameDocument;
use serde_json::Value;

use super::SerializeError;

/// Map a document onto a JSON tree. Numbers stay numeric.
pub fn to_json_tree(doc: &GameDocument) -> Result<Value, SerializeError> {
    Ok(serde_json::to_value(doc)?)
}

/// Build a document from a JSON tree, trusting its native types.
pub fn from_json_tree(tree: Value) -> Result<GameDocument, SerializeError> {
    Ok(serde_json::from_value(tree)?)
}

/// Serialize to compact canonical JSON (RFC 8785).
///
/// Output is byte-for-byte deterministic for equal documents.
pub fn to_story_json(doc: &GameDocument) -> Result<String, SerializeError> {
    let bytes =
        serde_json_canonicalizer::to_vec(doc).map_err(|e| SerializeError::Jcs(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Jcs(e.to_string()))
}

/// Serialize to indented JSON for reading.
pub fn to_story_json_pretty(doc: &GameDocument) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Parse a story file.
pub fn from_story_json(text: &str) -> Result<GameDocument, SerializeError> {
    Ok(serde_json::from_str(text)?)
}
