//! Story documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ModelError;
use crate::object::GameObject;
use crate::value::Value;

/// IDs an editor reserves for its own use.
pub const RESERVED_IDS: &[&str] = &["here", "me"];

/// ID of the scaffold room every new document starts in.
pub const LIMBO: &str = "limbo";

/// ID of the player character.
pub const HERO: &str = "hero";

/// Returns true if `id` is reserved.
pub fn is_reserved_id(id: &str) -> bool {
    RESERVED_IDS.contains(&id)
}

/// Values a fresh document starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryDefaults {
    pub title: String,
    pub author: String,
    pub banner: String,
    pub max_score: f64,
    pub use_score: bool,
}

impl Default for StoryDefaults {
    fn default() -> Self {
        Self {
            title: "An Interactive Fiction".to_string(),
            author: "Anonymous".to_string(),
            banner: String::new(),
            max_score: 0.0,
            use_score: true,
        }
    }
}

/// A whole story: metadata, interpreter configuration and the object graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDocument {
    #[serde(default)]
    pub meta: BTreeMap<String, String>,

    #[serde(default)]
    pub config: BTreeMap<String, Value>,

    #[serde(default)]
    pub objects: BTreeMap<String, GameObject>,
}

impl GameDocument {
    /// A document with no meta, config or objects.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh document with builtin defaults: `limbo` and `hero`.
    pub fn new_story() -> Self {
        Self::new_story_with(&StoryDefaults::default())
    }

    /// A fresh document seeded from `defaults`.
    ///
    /// Each call builds a new graph and a new IFID.
    pub fn new_story_with(defaults: &StoryDefaults) -> Self {
        let meta = BTreeMap::from([
            ("title".to_string(), defaults.title.clone()),
            ("author".to_string(), defaults.author.clone()),
            ("ifid".to_string(), uuid::Uuid::new_v4().to_string()),
        ]);
        let config = BTreeMap::from([
            ("banner".to_string(), Value::text(defaults.banner.clone())),
            ("max_score".to_string(), Value::Number(defaults.max_score)),
            ("use_score".to_string(), Value::Bool(defaults.use_score)),
        ]);

        let mut limbo = GameObject::room("Limbo");
        limbo.set_property("description", Value::text("You are in limbo."));
        let hero = GameObject::actor("You", Some(LIMBO));

        let objects = BTreeMap::from([(LIMBO.to_string(), limbo), (HERO.to_string(), hero)]);

        Self {
            meta,
            config,
            objects,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn object(&self, id: &str) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    /// Get an object, creating an empty one if it does not exist.
    pub fn object_or_insert(&mut self, id: &str) -> &mut GameObject {
        self.objects.entry(id.to_string()).or_default()
    }

    /// Add a new object under a fresh ID.
    pub fn create_object(&mut self, id: &str, obj: GameObject) -> Result<(), ModelError> {
        Self::check_new_id(id)?;
        if self.contains(id) {
            return Err(ModelError::DuplicateId(id.to_string()));
        }
        self.objects.insert(id.to_string(), obj);
        Ok(())
    }

    /// Remove an object entirely.
    pub fn delete_object(&mut self, id: &str) -> Result<GameObject, ModelError> {
        self.objects
            .remove(id)
            .ok_or_else(|| ModelError::NoSuchObject(id.to_string()))
    }

    /// Copy an existing object under a new ID.
    pub fn clone_object(&mut self, from: &str, to: &str) -> Result<(), ModelError> {
        let copy = self
            .object(from)
            .cloned()
            .ok_or_else(|| ModelError::NoSuchObject(from.to_string()))?;
        self.create_object(to, copy)
    }

    /// Set a property on an existing object.
    pub fn set_property(&mut self, id: &str, name: &str, value: Value) -> Result<(), ModelError> {
        self.object_mut(id)
            .ok_or_else(|| ModelError::NoSuchObject(id.to_string()))?
            .set_property(name, value);
        Ok(())
    }

    /// Remove a property from an existing object.
    pub fn remove_property(&mut self, id: &str, name: &str) -> Result<bool, ModelError> {
        Ok(self
            .object_mut(id)
            .ok_or_else(|| ModelError::NoSuchObject(id.to_string()))?
            .remove_property(name))
    }

    /// IDs of every object whose property `name` equals `value`, in ID order.
    pub fn find_objects(&self, name: &str, value: &Value) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.property(name).as_ref() == Some(value))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// IDs of every object located in `parent`.
    pub fn contents_of(&self, parent: &str) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.location().as_deref() == Some(parent))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    fn check_new_id(id: &str) -> Result<(), ModelError> {
        if id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        if is_reserved_id(id) {
            return Err(ModelError::ReservedId(id.to_string()));
        }
        Ok(())
    }
}
