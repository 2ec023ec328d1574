//! Round trips between the story forms.

use advprompt::sectioned::{parse, write};
use advprompt::serialize::{
    from_json_tree, from_sectioned_text, from_story_json, to_json_tree, to_sectioned_text,
    to_story_json, to_story_json_pretty,
};
use advprompt::{merge, merge_all, GameDocument, GameObject, Lock, Value};
use adv_model::{infer_value, render_value, HERO, LIMBO};

fn sample_story() -> GameDocument {
    let mut doc = GameDocument::new_story();
    doc.create_object("hall", GameObject::room("Great Hall")).unwrap();
    doc.create_object("door", GameObject::exit("door", Some("hall"))).unwrap();
    doc.set_property("door", "location", Value::text(LIMBO)).unwrap();
    doc.set_property("door", "lock", Value::text("@brass")).unwrap();
    doc.create_object("brass", GameObject::thing("brass key", Some("hall"))).unwrap();
    doc.set_property("brass", "weight", Value::Number(3.0)).unwrap();
    doc.set_property("hall", "dark", Value::Bool(true)).unwrap();
    doc.set_property("hall", "description", Value::text("Tall windows.\nCold floor.")).unwrap();
    doc
}

#[test]
fn test_sectioned_text_roundtrip() {
    let doc = sample_story();
    let text = write(&to_sectioned_text(&doc));
    let back = from_sectioned_text(&parse(&text).unwrap());
    assert_eq!(back, doc);
}

#[test]
fn test_json_tree_roundtrip() {
    let doc = sample_story();
    assert_eq!(from_json_tree(to_json_tree(&doc).unwrap()).unwrap(), doc);
}

#[test]
fn test_story_json_forms_agree() {
    let doc = sample_story();
    let compact = to_story_json(&doc).unwrap();
    let pretty = to_story_json_pretty(&doc).unwrap();

    assert_eq!(from_story_json(&compact).unwrap(), doc);
    assert_eq!(from_story_json(&pretty).unwrap(), doc);
    assert!(compact.contains("\"weight\":3"));
    assert!(compact.contains("\"lock\":\"@brass\""));
}

#[test]
fn test_values_stable_under_render() {
    for text in ["True", "no", "42", "-7", "2.5", "1e400", "nan", "hello", "", "@key"] {
        let value = infer_value(text);
        assert_eq!(infer_value(&render_value(&value)), value, "input {:?}", text);
    }
}

#[test]
fn test_merge_order_matters() {
    let a = parse("[box]\nname = red box\n").unwrap();
    let b = parse("[box]\nname = blue box\nsize = 2\n").unwrap();

    let mut ab = GameDocument::new_story();
    merge_all(&mut ab, [&a, &b]);
    let mut ba = GameDocument::new_story();
    merge_all(&mut ba, [&b, &a]);

    let name = |doc: &GameDocument| doc.object("box").unwrap().property("name");
    assert_eq!(name(&ab), Some(Value::text("blue box")));
    assert_eq!(name(&ba), Some(Value::text("red box")));
    // Omission never removes
    assert_eq!(ba.object("box").unwrap().property("size"), Some(Value::Number(2.0)));
}

#[test]
fn test_merge_is_additive_on_existing_objects() {
    let mut doc = GameDocument::new_story();
    merge(&mut doc, &parse("[hero]\nlocation = hall\nlock = yes\n").unwrap());

    let hero = doc.object(HERO).unwrap();
    assert_eq!(hero.property("name"), Some(Value::text("You")));
    assert_eq!(hero.location().as_deref(), Some("hall"));
    assert_eq!(hero.lock, Some(Lock::Unconditional));
}
