//! Game objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::lock::{Lock, RawLock};
use crate::value::{render_value, Value};

/// Object types an interpreter understands. Anything else is accepted but
/// flagged by validation.
pub const KNOWN_TYPES: &[&str] = &[
    "room", "actor", "exit", "thing", "scenery", "vehicle", "text", "action", "spell", "topic",
];

/// Type given to objects that declare none.
pub const DEFAULT_TYPE: &str = "thing";

/// Property holding the object type.
pub const TYPE: &str = "type";
/// Property holding the lock.
pub const LOCK: &str = "lock";
/// Containment parent.
pub const LOCATION: &str = "location";
/// Traversal target.
pub const LINK: &str = "link";
pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";

/// Returns true if `object_type` is one of [`KNOWN_TYPES`].
pub fn is_known_type(object_type: &str) -> bool {
    KNOWN_TYPES.contains(&object_type)
}

/// One object in the story graph.
///
/// `type` and `lock` are held in typed fields; every other property lives
/// in `properties`. On the wire all of them are flat keys of one object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObject", into = "RawObject")]
pub struct GameObject {
    pub object_type: Option<String>,
    pub lock: Option<Lock>,
    pub properties: BTreeMap<String, Value>,
}

impl GameObject {
    /// An object with no type and no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// An object of the given type with a name.
    pub fn with_type(object_type: &str, name: &str) -> Self {
        let mut obj = Self {
            object_type: Some(object_type.to_string()),
            ..Self::default()
        };
        obj.properties.insert(NAME.to_string(), Value::text(name));
        obj
    }

    pub fn room(name: &str) -> Self {
        let mut obj = Self::with_type("room", name);
        obj.set_property(DESCRIPTION, Value::text(""));
        obj
    }

    pub fn actor(name: &str, location: Option<&str>) -> Self {
        let mut obj = Self::with_type("actor", name);
        obj.set_property(DESCRIPTION, Value::text("As good-looking as ever."));
        if let Some(loc) = location {
            obj.set_property(LOCATION, Value::text(loc));
        }
        obj
    }

    pub fn exit(name: &str, link: Option<&str>) -> Self {
        let mut obj = Self::with_type("exit", name);
        if let Some(dest) = link {
            obj.set_property(LINK, Value::text(dest));
        }
        obj
    }

    pub fn thing(name: &str, location: Option<&str>) -> Self {
        let mut obj = Self::with_type("thing", name);
        obj.set_property(DESCRIPTION, Value::text(""));
        if let Some(loc) = location {
            obj.set_property(LOCATION, Value::text(loc));
        }
        obj
    }

    /// Read a property by name, including `type` and `lock`.
    ///
    /// A property lock has no plain value and reads as `None`; use the
    /// `lock` field for it.
    pub fn property(&self, name: &str) -> Option<Value> {
        match name {
            TYPE => self.object_type.clone().map(Value::Text),
            LOCK => self.lock.as_ref().and_then(Lock::as_value),
            _ => self.properties.get(name).cloned(),
        }
    }

    /// Set a property by name, overwriting any previous value.
    ///
    /// `type` is stored as text. `lock` goes through [`Lock::from_value`], so
    /// `false` clears it.
    pub fn set_property(&mut self, name: &str, value: Value) {
        match name {
            TYPE => self.object_type = Some(render_value(&value)),
            LOCK => self.lock = Lock::from_value(value),
            _ => {
                self.properties.insert(name.to_string(), value);
            }
        }
    }

    /// Remove a property, returning whether it was present.
    pub fn remove_property(&mut self, name: &str) -> bool {
        match name {
            TYPE => self.object_type.take().is_some(),
            LOCK => self.lock.take().is_some(),
            _ => self.properties.remove(name).is_some(),
        }
    }

    /// Text of a reference property (`location`, `link`), if set.
    ///
    /// Non-text values are rendered so a numeric ID still resolves.
    pub fn reference(&self, name: &str) -> Option<String> {
        self.properties.get(name).map(render_value)
    }

    pub fn location(&self) -> Option<String> {
        self.reference(LOCATION)
    }

    pub fn link(&self) -> Option<String> {
        self.reference(LINK)
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get(NAME).and_then(Value::as_text)
    }

    /// True if the boolean flag is set. Flags are ordinary properties.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.properties
            .get(flag)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Wire shape of an object.
#[derive(Debug, Serialize, Deserialize)]
struct RawObject {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    object_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    lock: Option<RawLock>,

    /// Story files written by older editors carry `null` for unset
    /// references.
    #[serde(flatten)]
    properties: BTreeMap<String, Option<Value>>,
}

impl TryFrom<RawObject> for GameObject {
    type Error = String;

    fn try_from(raw: RawObject) -> Result<Self, Self::Error> {
        let lock = match raw.lock {
            None | Some(RawLock::Flag(false)) => None,
            Some(other) => Some(Lock::try_from(other)?),
        };
        let properties = raw
            .properties
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        Ok(GameObject {
            object_type: raw.object_type,
            lock,
            properties,
        })
    }
}

impl From<GameObject> for RawObject {
    fn from(obj: GameObject) -> Self {
        RawObject {
            object_type: obj.object_type,
            lock: obj.lock.map(RawLock::from),
            properties: obj
                .properties
                .into_iter()
                .map(|(k, v)| (k, Some(v)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::Sigil;
    use serde_json::json;

    #[test]
    fn test_type_and_lock_route_to_fields() {
        let mut obj = GameObject::new();
        obj.set_property("type", Value::text("exit"));
        obj.set_property("lock", Value::text("+key"));
        obj.set_property("name", Value::text("North"));

        assert_eq!(obj.object_type.as_deref(), Some("exit"));
        assert_eq!(obj.lock, Some(Lock::keyed(Sigil::Plus, "key")));
        assert_eq!(obj.properties.len(), 1);
        assert_eq!(obj.property("type"), Some(Value::text("exit")));
        assert_eq!(obj.property("lock"), Some(Value::text("+key")));
    }

    #[test]
    fn test_lock_false_clears() {
        let mut obj = GameObject::thing("Box", None);
        obj.set_property("lock", Value::Bool(true));
        assert_eq!(obj.lock, Some(Lock::Unconditional));
        obj.set_property("lock", Value::Bool(false));
        assert_eq!(obj.lock, None);
    }

    #[test]
    fn test_remove_property() {
        let mut obj = GameObject::thing("Lamp", Some("cellar"));
        assert!(obj.remove_property("location"));
        assert!(!obj.remove_property("location"));
        assert!(obj.remove_property("type"));
        assert!(obj.object_type.is_none());
    }

    #[test]
    fn test_numeric_reference_renders() {
        let mut obj = GameObject::new();
        obj.set_property("link", Value::Number(12.0));
        assert_eq!(obj.link(), Some("12".to_string()));
    }

    #[test]
    fn test_flags_are_plain_properties() {
        let mut obj = GameObject::room("Cellar");
        obj.set_property("dark", Value::Bool(true));
        assert!(obj.has_flag("dark"));
        assert!(!obj.has_flag("sticky"));
        assert_eq!(obj.properties.get("dark"), Some(&Value::Bool(true)));

        obj.set_property("visited", Value::Bool(false));
        obj.set_property("light", Value::text("yes"));
        obj.set_property("ending", Value::Number(1.0));
        assert!(!obj.has_flag("visited"));
        assert!(!obj.has_flag("light"));
        assert!(!obj.has_flag("ending"));
    }

    #[test]
    fn test_json_is_flat() {
        let mut obj = GameObject::exit("Door", Some("hall"));
        obj.lock = Some(Lock::Unconditional);
        let value = serde_json::to_value(&obj).unwrap();
        assert_eq!(
            value,
            json!({"type": "exit", "lock": true, "name": "Door", "link": "hall"})
        );
    }

    #[test]
    fn test_json_nulls_are_absent() {
        let obj: GameObject = serde_json::from_value(json!({
            "type": "room",
            "name": "Hall",
            "location": null,
            "lock": false
        }))
        .unwrap();
        assert_eq!(obj.object_type.as_deref(), Some("room"));
        assert!(obj.lock.is_none());
        assert!(!obj.properties.contains_key("location"));
    }
}
