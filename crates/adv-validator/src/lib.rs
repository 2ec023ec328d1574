//! Structural validator for story documents.
//!
//! Validation runs in two passes. The first resolves every reference
//! (`link`, `location`, lock keys) and records which objects are reachable;
//! the second classifies object types and unreachable rooms using that
//! complete set. Every problem is collected; nothing short-circuits.

mod result;

pub use result::{Diagnostic, DiagnosticKind, Severity, ValidationReport};

use adv_model::{is_known_type, GameDocument, KeyRef, DEFAULT_TYPE, LIMBO};
use std::collections::BTreeSet;

/// Validate a document in place.
///
/// The only mutations are giving untyped objects the default type and
/// deleting an unreferenced `limbo` room.
pub fn validate(doc: &mut GameDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    resolve_references(doc, &mut report);
    tracing::debug!(
        linked = report.linked.len(),
        errors = report.error_count,
        "reference pass complete"
    );

    classify_objects(doc, &mut report);
    tracing::debug!(
        warnings = report.warning_count,
        removed = report.removed.len(),
        "type pass complete"
    );

    report
}

/// Pass 1: check references and build the linked set.
fn resolve_references(doc: &GameDocument, report: &mut ValidationReport) {
    let mut linked = BTreeSet::new();

    for (id, obj) in &doc.objects {
        if let Some(target) = obj.link() {
            if doc.contains(&target) {
                linked.insert(target);
            } else {
                report.push(id, DiagnosticKind::BadLink(target));
            }
        }

        if let Some(parent) = obj.location() {
            // Counted as an error for every object, hero or not.
            if doc.contains(&parent) {
                linked.insert(parent);
            } else {
                report.push(id, DiagnosticKind::BadParent(parent));
            }
        }

        if let Some(key_ref) = obj.lock.as_ref().and_then(|lock| lock.key_ref()) {
            match key_ref {
                KeyRef::Valid { key, .. } => {
                    if doc.contains(key) {
                        linked.insert(key.to_string());
                    } else {
                        report.push(id, DiagnosticKind::BadKey(key.to_string()));
                    }
                }
                KeyRef::BadSigil(sigil) => {
                    report.push(id, DiagnosticKind::BadLock(sigil));
                }
            }
        }
    }

    report.linked = linked;
}

/// Pass 2: default missing types, flag unknown ones and unreachable rooms.
fn classify_objects(doc: &mut GameDocument, report: &mut ValidationReport) {
    let ids: Vec<String> = doc.objects.keys().cloned().collect();

    for id in ids {
        let Some(obj) = doc.objects.get_mut(&id) else {
            continue;
        };

        match obj.object_type.as_deref() {
            None => {
                obj.object_type = Some(DEFAULT_TYPE.to_string());
                report.push(&id, DiagnosticKind::DefaultType);
            }
            Some(t) if !is_known_type(t) => {
                let t = t.to_string();
                report.push(&id, DiagnosticKind::UnknownType(t));
            }
            Some("room") if !report.linked.contains(&id) => {
                if id == LIMBO {
                    doc.objects.remove(&id);
                    tracing::debug!("removed unused {} room", LIMBO);
                    report.removed.push(id);
                } else {
                    report.push(&id, DiagnosticKind::UnlinkedRoom);
                }
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adv_model::{GameObject, Lock, Value, HERO};

    fn story() -> GameDocument {
        GameDocument::new_story()
    }

    #[test]
    fn test_default_story_is_clean() {
        let mut doc = story();
        let report = validate(&mut doc);
        assert!(report.is_valid());
        assert!(report.diagnostics.is_empty());
        assert!(doc.contains(LIMBO));
        assert!(report.linked.contains(LIMBO));
    }

    #[test]
    fn test_bad_link() {
        let mut doc = story();
        doc.create_object("door", GameObject::exit("Door", Some("ghost")))
            .unwrap();
        doc.set_property("door", "location", Value::text(LIMBO))
            .unwrap();

        let report = validate(&mut doc);
        assert!(!report.is_valid());
        assert_eq!(report.error_count, 1);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::new("door", DiagnosticKind::BadLink("ghost".to_string()))]
        );
    }

    #[test]
    fn test_bad_parent_counts_for_any_object() {
        let mut doc = story();
        doc.set_property(HERO, "location", Value::text("nowhere"))
            .unwrap();
        doc.create_object("rock", GameObject::thing("Rock", Some("void")))
            .unwrap();

        let report = validate(&mut doc);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.codes(), vec!["hero:BAD_PARENT:nowhere", "rock:BAD_PARENT:void"]);
    }

    #[test]
    fn test_valid_lock_links_key() {
        let mut doc = story();
        doc.create_object("keyA", GameObject::thing("Key", Some(LIMBO)))
            .unwrap();
        doc.create_object("vault", GameObject::room("Vault")).unwrap();
        doc.set_property("vault", "lock", Value::text("@keyA")).unwrap();
        doc.set_property("vault", "link", Value::text(LIMBO)).unwrap();
        doc.set_property(LIMBO, "link", Value::text("vault")).unwrap();

        let report = validate(&mut doc);
        assert!(report.is_valid(), "{:?}", report.diagnostics);
        assert!(report.linked.contains("keyA"));
    }

    #[test]
    fn test_bad_sigil_regardless_of_key() {
        let mut doc = story();
        doc.create_object("keyA", GameObject::thing("Key", Some(LIMBO)))
            .unwrap();
        doc.set_property("keyA", "lock", Value::text("*keyA")).unwrap();

        let report = validate(&mut doc);
        assert_eq!(report.codes(), vec!["keyA:BAD_LOCK:*"]);
        assert!(!report.linked.contains("keyA"));
    }

    #[test]
    fn test_bad_key() {
        let mut doc = story();
        doc.create_object("chest", GameObject::thing("Chest", Some(LIMBO)))
            .unwrap();
        doc.set_property("chest", "lock", Value::text("+missing")).unwrap();

        let report = validate(&mut doc);
        assert_eq!(report.codes(), vec!["chest:BAD_KEY:missing"]);
    }

    #[test]
    fn test_unconditional_and_property_locks_not_checked() {
        let mut doc = story();
        let mut chest = GameObject::thing("Chest", Some(LIMBO));
        chest.lock = Some(Lock::Unconditional);
        doc.create_object("chest", chest).unwrap();
        let mut gate = GameObject::thing("Gate", Some(LIMBO));
        gate.lock = Some(Lock::Property {
            name: "opened".to_string(),
            expected: Value::Bool(true),
        });
        doc.create_object("gate", gate).unwrap();

        let report = validate(&mut doc);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_default_type_assigned() {
        let mut doc = story();
        doc.objects.insert("pebble".to_string(), GameObject::new());
        doc.set_property("pebble", "location", Value::text(LIMBO))
            .unwrap();

        let report = validate(&mut doc);
        assert!(report.is_valid());
        assert_eq!(report.codes(), vec!["pebble:DEFAULT_TYPE"]);
        assert_eq!(
            doc.object("pebble").unwrap().object_type.as_deref(),
            Some("thing")
        );
    }

    #[test]
    fn test_unknown_type_is_warning_only() {
        let mut doc = story();
        doc.create_object("portal", GameObject::with_type("portal", "Portal"))
            .unwrap();

        let report = validate(&mut doc);
        assert!(report.is_valid());
        assert_eq!(report.codes(), vec!["portal:UNKNOWN_TYPE:portal"]);
        assert_eq!(
            doc.object("portal").unwrap().object_type.as_deref(),
            Some("portal")
        );
    }

    #[test]
    fn test_unlinked_limbo_removed_silently() {
        let mut doc = story();
        doc.create_object("hall", GameObject::room("Hall")).unwrap();
        doc.set_property(HERO, "location", Value::text("hall")).unwrap();

        let report = validate(&mut doc);
        assert!(!doc.contains(LIMBO));
        assert_eq!(report.removed, vec![LIMBO.to_string()]);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_unlinked_room_warning() {
        let mut doc = story();
        doc.create_object("attic", GameObject::room("Attic")).unwrap();

        let report = validate(&mut doc);
        assert!(report.is_valid());
        assert_eq!(report.codes(), vec!["attic:UNLINKED_ROOM"]);
        assert!(doc.contains("attic"));
    }

    #[test]
    fn test_all_problems_collected() {
        let mut doc = story();
        doc.create_object("a", GameObject::exit("A", Some("x"))).unwrap();
        doc.set_property("a", "location", Value::text("y")).unwrap();
        doc.set_property("a", "lock", Value::text("=z")).unwrap();
        doc.objects.insert("b".to_string(), GameObject::new());

        let report = validate(&mut doc);
        assert_eq!(report.error_count, 3);
        assert_eq!(report.warning_count, 1);
        assert_eq!(
            report.codes(),
            vec!["a:BAD_LINK:x", "a:BAD_PARENT:y", "a:BAD_LOCK:=", "b:DEFAULT_TYPE"]
        );
    }
}
