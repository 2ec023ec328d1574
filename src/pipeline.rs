//! Compile pipeline
//!
//! Reads sectioned sources in order, folds them into a fresh story, runs the
//! validator and renders the requested output. File handles are opened, read
//! to the end and closed here; nothing downstream touches the filesystem.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::string::FromUtf8Error;

use adv_model::{GameDocument, StoryDefaults};
use adv_validator::{validate, Diagnostic, ValidationReport};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::merge::merge;
use crate::sectioned::{self, SectionedError};
use crate::serialize::{from_story_json, to_sectioned_text, to_story_json, to_story_json_pretty, SerializeError};
use crate::settings::SettingsError;
use crate::stats::StoryStats;
use crate::template::BundleError;

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("could not read {path}: {source}")]
    Encoding { path: String, source: FromUtf8Error },

    #[error("could not read {path}: {source}")]
    Parse { path: String, source: SectionedError },

    #[error("could not read story {path}: {source}")]
    Story { path: String, source: SerializeError },

    #[error("could not write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("serialization error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("story has {0} error(s)")]
    Invalid(usize),
}

impl PipelineError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Invalid(_) => 2,
            _ => 1,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// What `compile` emits on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Story file (JSON)
    #[default]
    Story,
    /// Merged sectioned text
    Merged,
    /// Object count by type
    Stats,
}

/// Compile options
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Run the validator after merging
    pub validate: bool,

    /// Seed values for the fresh story
    pub defaults: StoryDefaults,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            validate: true,
            defaults: StoryDefaults::default(),
        }
    }
}

/// One merged source and its content digest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRecord {
    pub path: String,

    /// SHA-256 of the raw bytes (hex)
    pub sha256: String,

    /// Number of sections in the source, reserved ones included
    pub sections: usize,
}

impl SourceRecord {
    fn new(path: &str, bytes: &[u8], sections: usize) -> Self {
        Self {
            path: path.to_string(),
            sha256: hex::encode(Sha256::digest(bytes)),
            sections,
        }
    }
}

/// Result of a compile run.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub document: GameDocument,

    /// None when validation was skipped
    pub validation: Option<ValidationReport>,

    pub sources: Vec<SourceRecord>,
}

impl CompileOutcome {
    pub fn error_count(&self) -> usize {
        self.validation.as_ref().map_or(0, |r| r.error_count)
    }

    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Diagnostics in the order the validator found them.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.validation
            .as_ref()
            .map_or(&[][..], |r| r.diagnostics.as_slice())
    }

    /// Render the requested output. Refuses when the story has errors.
    pub fn render(&self, mode: OutputMode, pretty: bool) -> PipelineResult<String> {
        if !self.is_valid() {
            return Err(PipelineError::Invalid(self.error_count()));
        }
        let out = match mode {
            OutputMode::Story if pretty => to_story_json_pretty(&self.document)?,
            OutputMode::Story => to_story_json(&self.document)?,
            OutputMode::Merged => sectioned::write(&to_sectioned_text(&self.document)),
            OutputMode::Stats => StoryStats::collect(&self.document).to_human(),
        };
        Ok(out)
    }

    /// Machine-readable summary of the run.
    pub fn report(&self) -> CompileReport {
        let (warning_count, removed) = match &self.validation {
            Some(r) => (r.warning_count, r.removed.clone()),
            None => (0, Vec::new()),
        };
        CompileReport {
            valid: self.is_valid(),
            validated: self.validation.is_some(),
            error_count: self.error_count(),
            warning_count,
            diagnostics: self.diagnostics().to_vec(),
            removed,
            sources: self.sources.clone(),
            stats: StoryStats::collect(&self.document),
        }
    }
}

/// Compile report written by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub valid: bool,
    pub validated: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
    pub sources: Vec<SourceRecord>,
    pub stats: StoryStats,
}

impl CompileReport {
    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self).map_err(SerializeError::from)?)
    }
}

/// Compile sources in order into a story.
///
/// Any read or parse failure aborts the whole run; sources merged before the
/// failure are discarded with the document.
pub fn compile<P: AsRef<Path>>(paths: &[P], options: &CompileOptions) -> PipelineResult<CompileOutcome> {
    let mut document = GameDocument::new_story_with(&options.defaults);
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let label = path.to_string_lossy().to_string();
        let text = read_text(path)?;
        let source = sectioned::parse(&text).map_err(|source| PipelineError::Parse {
            path: label.clone(),
            source,
        })?;
        merge(&mut document, &source);
        tracing::debug!(path = %label, sections = source.sections.len(), "merged source");
        sources.push(SourceRecord::new(&label, text.as_bytes(), source.sections.len()));
    }

    let validation = options.validate.then(|| validate(&mut document));
    if let Some(report) = &validation {
        tracing::info!(
            sources = sources.len(),
            objects = document.objects.len(),
            errors = report.error_count,
            warnings = report.warning_count,
            "compiled story"
        );
    } else {
        tracing::info!(
            sources = sources.len(),
            objects = document.objects.len(),
            "compiled story without validation"
        );
    }

    Ok(CompileOutcome {
        document,
        validation,
        sources,
    })
}

/// Load a story file.
pub fn load_story(path: &Path) -> PipelineResult<GameDocument> {
    let text = read_text(path)?;
    from_story_json(&text).map_err(|source| PipelineError::Story {
        path: path.to_string_lossy().to_string(),
        source,
    })
}

/// Read a whole file, or stdin for `-`.
pub fn read_input(path: &Path) -> PipelineResult<Vec<u8>> {
    let label = || path.to_string_lossy().to_string();
    if path == Path::new(STDIN_PATH) {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|source| PipelineError::Read { path: label(), source })?;
        return Ok(buf);
    }
    fs::read(path).map_err(|source| PipelineError::Read { path: label(), source })
}

/// Read a whole file, or stdin for `-`, as UTF-8 text.
pub fn read_text(path: &Path) -> PipelineResult<String> {
    String::from_utf8(read_input(path)?).map_err(|source| PipelineError::Encoding {
        path: path.to_string_lossy().to_string(),
        source,
    })
}

/// Write output to a file, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> PipelineResult<()> {
    match path {
        Some(path) => fs::write(path, contents).map_err(|source| PipelineError::Write {
            path: path.to_string_lossy().to_string(),
            source,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| PipelineError::Write {
                    path: "<stdout>".to_string(),
                    source,
                })
        }
    }
}
