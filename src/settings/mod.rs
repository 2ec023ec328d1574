//! Compiler settings
//!
//! Three layers, merged in order:
//! 1. Built-in defaults
//! 2. Settings file (`--settings <path>`, else `./advc.toml` when present)
//! 3. CLI flags

mod defaults;
mod merge;

pub use defaults::{BuiltinDefaults, DEFAULT_PLACEHOLDER, DEFAULT_SETTINGS_FILE};
pub use merge::{deep_merge, merge_layers};

use adv_model::StoryDefaults;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Origin of a settings layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing settings layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSource {
    pub origin: SettingsOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Defaults for new story metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorySettings {
    pub title: String,
    pub author: String,
}

/// Defaults for new story configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigSettings {
    pub banner: String,
    pub max_score: f64,
    pub use_score: bool,
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    pub pretty: bool,
    pub placeholder: String,
}

/// Resolved settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub story: StorySettings,
    pub config: ConfigSettings,
    pub output: OutputSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let builtin = BuiltinDefaults::default();
        Self {
            story: StorySettings {
                title: builtin.story.title,
                author: builtin.story.author,
            },
            config: ConfigSettings {
                banner: builtin.story.banner,
                max_score: builtin.story.max_score,
                use_score: builtin.story.use_score,
            },
            output: OutputSettings {
                pretty: builtin.pretty,
                placeholder: builtin.placeholder,
            },
        }
    }
}

impl Settings {
    /// Resolve settings from the layers.
    ///
    /// A missing file at an explicit path is an error; `None` falls back to
    /// `./advc.toml` only if it exists.
    pub fn build(
        file: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<(Self, Vec<SettingsSource>), SettingsError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![SettingsSource {
            origin: SettingsOrigin::Builtin,
            path: None,
        }];

        let implicit = Path::new(DEFAULT_SETTINGS_FILE);
        let file = match file {
            Some(path) => Some(path),
            None if implicit.exists() => Some(implicit),
            None => None,
        };
        if let Some(path) = file {
            layers.push(Self::load_toml_file(path)?);
            sources.push(SettingsSource {
                origin: SettingsOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
            });
            tracing::debug!(path = %path.display(), "loaded settings file");
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(SettingsSource {
                origin: SettingsOrigin::Cli,
                path: None,
            });
        }

        let settings = Self::from_value(merge_layers(layers))?;
        settings.validate()?;
        Ok((settings, sources))
    }

    fn from_value(value: Value) -> Result<Self, SettingsError> {
        serde_json::from_value(value).map_err(|e| SettingsError::ParseError(e.to_string()))
    }

    /// Load and parse a TOML settings file
    fn load_toml_file(path: &Path) -> Result<Value, SettingsError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("{}: {}", path.display(), e)))?;
        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?;
        Ok(Self::toml_to_json(toml_value))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => Value::Array(arr.into_iter().map(Self::toml_to_json).collect()),
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !self.config.max_score.is_finite() || self.config.max_score < 0.0 {
            return Err(SettingsError::ValidationError(
                "config.max_score must be a non-negative number".to_string(),
            ));
        }
        if self.output.placeholder.trim().is_empty() {
            return Err(SettingsError::ValidationError(
                "output.placeholder must not be blank".to_string(),
            ));
        }
        if self.output.placeholder.contains('\n') {
            return Err(SettingsError::ValidationError(
                "output.placeholder must be a single line".to_string(),
            ));
        }
        Ok(())
    }

    /// Values used to seed a fresh story.
    pub fn story_defaults(&self) -> StoryDefaults {
        StoryDefaults {
            title: self.story.title.clone(),
            author: self.story.author.clone(),
            banner: self.config.banner.clone(),
            max_score: self.config.max_score,
            use_score: self.config.use_score,
        }
    }
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_only() {
        let settings = Settings::default();
        assert_eq!(settings.story.title, "An Interactive Fiction");
        assert!(!settings.output.pretty);
        assert_eq!(settings.output.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(settings.story_defaults(), StoryDefaults::default());
    }

    #[test]
    fn test_builtin_layer_matches_default() {
        let (settings, sources) = Settings::build(Some(Path::new("/dev/null")), None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(sources[0].origin, SettingsOrigin::Builtin);
    }

    #[test]
    fn test_file_layer() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[story]").unwrap();
        writeln!(temp, "author = \"Jo Writer\"").unwrap();
        writeln!(temp, "[config]").unwrap();
        writeln!(temp, "max_score = 30").unwrap();

        let (settings, sources) = Settings::build(Some(temp.path()), None).unwrap();
        assert_eq!(settings.story.author, "Jo Writer");
        assert_eq!(settings.story.title, "An Interactive Fiction");
        assert_eq!(settings.config.max_score, 30.0);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].origin, SettingsOrigin::File);
    }

    #[test]
    fn test_cli_layer_wins() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[output]").unwrap();
        writeln!(temp, "pretty = false").unwrap();

        let cli = serde_json::json!({"output": {"pretty": true}});
        let (settings, sources) = Settings::build(Some(temp.path()), Some(cli)).unwrap();
        assert!(settings.output.pretty);
        assert_eq!(sources.last().unwrap().origin, SettingsOrigin::Cli);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[story]").unwrap();
        writeln!(temp, "subtitle = \"nope\"").unwrap();

        let result = Settings::build(Some(temp.path()), None);
        assert!(matches!(result, Err(SettingsError::ParseError(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Settings::build(Some(Path::new("/nonexistent/advc.toml")), None);
        assert!(matches!(result, Err(SettingsError::IoError(_))));
    }

    #[test]
    fn test_validation() {
        let cli = serde_json::json!({"config": {"max_score": -1}});
        let result = Settings::build(Some(Path::new("/dev/null")), Some(cli));
        assert!(matches!(result, Err(SettingsError::ValidationError(_))));

        let cli = serde_json::json!({"output": {"placeholder": "  "}});
        let result = Settings::build(Some(Path::new("/dev/null")), Some(cli));
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }
}
