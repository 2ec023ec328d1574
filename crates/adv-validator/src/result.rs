//! Validation result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How serious a diagnostic is. Only errors make a document invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Machine-readable problem found in a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "detail")]
pub enum DiagnosticKind {
    /// `link` names an object that does not exist.
    #[serde(rename = "BAD_LINK")]
    BadLink(String),

    /// `location` names an object that does not exist.
    #[serde(rename = "BAD_PARENT")]
    BadParent(String),

    /// Keyed lock does not start with a sigil.
    #[serde(rename = "BAD_LOCK")]
    BadLock(String),

    /// Keyed lock names a key object that does not exist.
    #[serde(rename = "BAD_KEY")]
    BadKey(String),

    /// Object had no type and was given the default one.
    #[serde(rename = "DEFAULT_TYPE")]
    DefaultType,

    /// Object type is not one an interpreter knows.
    #[serde(rename = "UNKNOWN_TYPE")]
    UnknownType(String),

    /// Room that nothing links to or is located in.
    #[serde(rename = "UNLINKED_ROOM")]
    UnlinkedRoom,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::BadLink(_)
            | DiagnosticKind::BadParent(_)
            | DiagnosticKind::BadLock(_)
            | DiagnosticKind::BadKey(_) => Severity::Error,
            DiagnosticKind::DefaultType
            | DiagnosticKind::UnknownType(_)
            | DiagnosticKind::UnlinkedRoom => Severity::Warning,
        }
    }

    /// Get a machine-readable string representation.
    pub fn to_code(&self) -> String {
        match self {
            DiagnosticKind::BadLink(t) => format!("BAD_LINK:{}", t),
            DiagnosticKind::BadParent(t) => format!("BAD_PARENT:{}", t),
            DiagnosticKind::BadLock(s) => format!("BAD_LOCK:{}", s),
            DiagnosticKind::BadKey(k) => format!("BAD_KEY:{}", k),
            DiagnosticKind::DefaultType => "DEFAULT_TYPE".to_string(),
            DiagnosticKind::UnknownType(t) => format!("UNKNOWN_TYPE:{}", t),
            DiagnosticKind::UnlinkedRoom => "UNLINKED_ROOM".to_string(),
        }
    }
}

/// One problem with one object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub object_id: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(object_id: &str, kind: DiagnosticKind) -> Self {
        Self {
            severity: kind.severity(),
            object_id: object_id.to_string(),
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.object_id;
        match &self.kind {
            DiagnosticKind::BadLink(t) => write!(f, "Bad link in {}: {}", id, t),
            DiagnosticKind::BadParent(t) => write!(f, "Bad location in {}: {}", id, t),
            DiagnosticKind::BadLock(s) => write!(f, "Bad lock sigil in {}: {:?}", id, s),
            DiagnosticKind::BadKey(k) => write!(f, "Bad key in {}: {}", id, k),
            DiagnosticKind::DefaultType => write!(f, "Object {} has no type, set to thing", id),
            DiagnosticKind::UnknownType(t) => write!(f, "Object {} has unknown type {}", id, t),
            DiagnosticKind::UnlinkedRoom => write!(f, "Room {} is not linked from anywhere", id),
        }
    }
}

/// Outcome of validating a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Number of error-level diagnostics.
    pub error_count: usize,

    /// Number of warning-level diagnostics.
    pub warning_count: usize,

    /// All diagnostics in the order they were found.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,

    /// IDs referenced by some object's link, location or lock key.
    #[serde(default)]
    pub linked: BTreeSet<String>,

    /// IDs deleted as unused scaffolding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }

    pub(crate) fn push(&mut self, object_id: &str, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(object_id, kind);
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Diagnostics as machine-readable codes prefixed with the object ID.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| format!("{}:{}", d.object_id, d.kind.to_code()))
            .collect()
    }
}
