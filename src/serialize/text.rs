//! Sectioned text form of a story.

use adv_model::object::{LOCK, TYPE};
use adv_model::{render_value, GameDocument, StoryDefaults};

use crate::merge::merge;
use crate::sectioned::{SectionedDocument, CONFIG_SECTION, META_SECTION};

/// Flatten a story into sections: `META`, `CONFIG`, then one per object.
pub fn to_sectioned_text(doc: &GameDocument) -> SectionedDocument {
    let mut out = SectionedDocument::new();

    let meta = out.section_mut(META_SECTION);
    for (key, value) in &doc.meta {
        meta.set(key, value.clone());
    }

    let config = out.section_mut(CONFIG_SECTION);
    for (key, value) in &doc.config {
        config.set(key, render_value(value));
    }

    for (id, obj) in &doc.objects {
        let section = out.section_mut(id);
        if let Some(t) = &obj.object_type {
            section.set(TYPE, t.clone());
        }
        if let Some(lock) = &obj.lock {
            section.set(LOCK, lock.to_text());
        }
        for (key, value) in &obj.properties {
            section.set(key, render_value(value));
        }
    }

    out
}

/// Build a story from sectioned text: a fresh story plus one merge.
pub fn from_sectioned_text(source: &SectionedDocument) -> GameDocument {
    from_sectioned_text_with(source, &StoryDefaults::default())
}

/// Like [`from_sectioned_text`], seeding the fresh story from `defaults`.
pub fn from_sectioned_text_with(
    source: &SectionedDocument,
    defaults: &StoryDefaults,
) -> GameDocument {
    let mut doc = GameDocument::new_story_with(defaults);
    merge(&mut doc, source);
    doc
}
