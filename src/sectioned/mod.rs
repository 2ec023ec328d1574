//! Sectioned key/value text.
//!
//! The human-editable source format: `[section]` headers followed by
//! `key = value` lines. Values are untyped text here; typing happens when a
//! document is merged into a story.

mod parser;
mod writer;

pub use parser::{parse, SectionedError};
pub use writer::write;

/// Section whose entries back-fill every object section of the same source.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Story metadata section.
pub const META_SECTION: &str = "META";

/// Interpreter configuration section.
pub const CONFIG_SECTION: &str = "CONFIG";

/// Returns true for section names that never name an object.
pub fn is_reserved_section(name: &str) -> bool {
    matches!(name, DEFAULT_SECTION | META_SECTION | CONFIG_SECTION)
}

/// One `[name]` block with its entries in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a key, replacing an existing entry in place.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }
}

/// A parsed sectioned document.
///
/// `[DEFAULT]` entries are held apart from the ordinary sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionedDocument {
    pub defaults: Vec<(String, String)>,
    pub sections: Vec<Section>,
}

impl SectionedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Get a section, appending an empty one if it does not exist.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Sections that describe objects, in source order.
    pub fn object_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|s| !is_reserved_section(&s.name))
    }

    /// Entries of `section` with `[DEFAULT]` entries filled in underneath.
    pub fn entries_with_defaults<'a>(
        &'a self,
        section: &'a Section,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let inherited = self
            .defaults
            .iter()
            .filter(move |(k, _)| !section.contains_key(k));
        inherited
            .chain(section.entries.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
