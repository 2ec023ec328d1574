//! Folding sectioned sources into a story.
//!
//! Merge semantics:
//! - META: copied verbatim as text (last wins)
//! - CONFIG: inferred, last wins
//! - any other section: an object, created on first sight; each key is
//!   inferred and set, last wins
//! - `[DEFAULT]` entries fill every section that lacks the key
//! - nothing is ever removed by omission

use adv_model::{infer_value, GameDocument, GameObject};

use crate::sectioned::{SectionedDocument, CONFIG_SECTION, META_SECTION};

/// Merge one source into `doc` in place.
pub fn merge(doc: &mut GameDocument, source: &SectionedDocument) {
    if let Some(meta) = source.section(META_SECTION) {
        for (key, value) in source.entries_with_defaults(meta) {
            doc.meta.insert(key.to_string(), value.to_string());
        }
    }

    if let Some(config) = source.section(CONFIG_SECTION) {
        for (key, value) in source.entries_with_defaults(config) {
            doc.config.insert(key.to_string(), infer_value(value));
        }
    }

    for section in source.object_sections() {
        let created = !doc.contains(&section.name);
        let obj = doc.object_or_insert(&section.name);
        for (key, value) in source.entries_with_defaults(section) {
            set_entry(obj, key, value);
        }
        tracing::debug!(object = %section.name, created, "merged section");
    }
}

/// Merge several sources in order; later sources win per property.
pub fn merge_all<'a>(
    doc: &mut GameDocument,
    sources: impl IntoIterator<Item = &'a SectionedDocument>,
) {
    for source in sources {
        merge(doc, source);
    }
}

// `lock` is inferred like any other value; text locks stay keyed.
fn set_entry(obj: &mut GameObject, key: &str, raw: &str) {
    obj.set_property(key, infer_value(raw));
}
