//! Built-in settings (lowest layer)

use adv_model::StoryDefaults;

/// Placeholder line replaced by the story file when bundling.
pub const DEFAULT_PLACEHOLDER: &str = "/* ADVENTURE PROMPT STORY */";

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "advc.toml";

/// Built-in values for every setting.
#[derive(Debug, Clone)]
pub struct BuiltinDefaults {
    pub story: StoryDefaults,

    /// Indent the story file (default: false, compact canonical JSON)
    pub pretty: bool,

    pub placeholder: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            story: StoryDefaults::default(),
            pretty: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a JSON value for merging.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "story": {
                "title": self.story.title,
                "author": self.story.author,
            },
            "config": {
                "banner": self.story.banner,
                "max_score": self.story.max_score,
                "use_score": self.story.use_score,
            },
            "output": {
                "pretty": self.pretty,
                "placeholder": self.placeholder,
            }
        })
    }
}
