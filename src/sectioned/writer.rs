//! Sectioned text writer.

use super::{SectionedDocument, DEFAULT_SECTION};

/// Render a document as sectioned text.
///
/// Multi-line values are written as tab-indented continuation lines, so the
/// output parses back to the same document.
pub fn write(doc: &SectionedDocument) -> String {
    let mut out = String::new();
    if !doc.defaults.is_empty() {
        write_section(&mut out, DEFAULT_SECTION, &doc.defaults);
    }
    for section in &doc.sections {
        write_section(&mut out, &section.name, &section.entries);
    }
    out
}

fn write_section(out: &mut String, name: &str, entries: &[(String, String)]) {
    out.push('[');
    out.push_str(name);
    out.push_str("]\n");
    for (key, value) in entries {
        out.push_str(key);
        out.push_str(" = ");
        out.push_str(&value.replace('\n', "\n\t"));
        out.push('\n');
    }
    out.push('\n');
}
