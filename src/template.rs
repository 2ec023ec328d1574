//! Embedding a story file into a template.
//!
//! The template carries one placeholder line; bundling swaps that line for
//! the story JSON and leaves everything else byte-for-byte intact.

/// Template errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BundleError {
    #[error("template has no placeholder line '{0}'")]
    MissingPlaceholder(String),
}

/// Replace the first line equal to `placeholder` (ignoring surrounding
/// whitespace on that line) with `story_json`.
pub fn bundle(template: &str, story_json: &str, placeholder: &str) -> Result<String, BundleError> {
    let placeholder = placeholder.trim();
    let mut offset = 0;
    for line in template.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim() == placeholder {
            let ending = &line[content.len()..];
            let mut out = String::with_capacity(template.len() + story_json.len());
            out.push_str(&template[..offset]);
            out.push_str(story_json);
            out.push_str(ending);
            out.push_str(&template[offset + line.len()..]);
            return Ok(out);
        }
        offset += line.len();
    }
    Err(BundleError::MissingPlaceholder(placeholder.to_string()))
}
