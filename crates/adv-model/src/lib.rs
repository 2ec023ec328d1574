//! Object graph model for Adventure Prompt story files.
//!
//! A story is a [`GameDocument`]: free-form metadata, interpreter
//! configuration and a map of object ID to [`GameObject`]. Objects carry a
//! type, an optional [`Lock`] and a bag of typed [`Value`] properties.

mod document;
mod error;
mod lock;
pub mod object;
mod value;

pub use document::{is_reserved_id, GameDocument, StoryDefaults, HERO, LIMBO, RESERVED_IDS};
pub use error::ModelError;
pub use lock::{KeyRef, Lock, Sigil};
pub use object::{is_known_type, GameObject, DEFAULT_TYPE, KNOWN_TYPES};
pub use value::{infer_value, render_value, Value};
