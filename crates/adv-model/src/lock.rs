//! Locks on objects.
//!
//! A lock is one of three shapes on the wire: `true` (always locked), a
//! sigil-prefixed key reference such as `"+brass_key"`, or a single-entry
//! mapping `{"property": expected}`. The sigil only selects how an
//! interpreter checks the key; this crate validates syntax and nothing else.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::value::{render_value, Value};

/// Lock sigils.
///
/// The meanings listed are the conventional ones read by interpreters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sigil {
    /// `?` the acting actor is the key object.
    Question,
    /// `!` the acting actor is not the key object.
    Bang,
    /// `+` the key object is carried.
    Plus,
    /// `-` the key object is not carried.
    Minus,
    /// `@` the key object is in scope.
    At,
    /// `^` the key object is out of scope.
    Caret,
    /// `#` the key room has been visited.
    Hash,
    /// `~` the key room has not been visited.
    Tilde,
}

impl Sigil {
    pub const ALL: [Sigil; 8] = [
        Sigil::Question,
        Sigil::Bang,
        Sigil::Plus,
        Sigil::Minus,
        Sigil::At,
        Sigil::Caret,
        Sigil::Hash,
        Sigil::Tilde,
    ];

    pub fn from_char(c: char) -> Option<Sigil> {
        match c {
            '?' => Some(Sigil::Question),
            '!' => Some(Sigil::Bang),
            '+' => Some(Sigil::Plus),
            '-' => Some(Sigil::Minus),
            '@' => Some(Sigil::At),
            '^' => Some(Sigil::Caret),
            '#' => Some(Sigil::Hash),
            '~' => Some(Sigil::Tilde),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Sigil::Question => '?',
            Sigil::Bang => '!',
            Sigil::Plus => '+',
            Sigil::Minus => '-',
            Sigil::At => '@',
            Sigil::Caret => '^',
            Sigil::Hash => '#',
            Sigil::Tilde => '~',
        }
    }
}

impl fmt::Display for Sigil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Result of splitting a keyed lock into sigil and key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRef<'a> {
    /// Well-formed `<sigil><key>`.
    Valid { sigil: Sigil, key: &'a str },
    /// The leading character is not a sigil. Holds that character, or an
    /// empty string for an empty lock.
    BadSigil(String),
}

/// A lock on an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLock", into = "RawLock")]
pub enum Lock {
    /// Locked with no key.
    Unconditional,
    /// Raw `<sigil><key>` text. Kept unparsed so a malformed sigil survives
    /// until validation.
    Key(String),
    /// Satisfied while the named property equals the expected value.
    Property { name: String, expected: Value },
}

impl Lock {
    /// Build a keyed lock from a sigil and key object ID.
    pub fn keyed(sigil: Sigil, key: &str) -> Self {
        Lock::Key(format!("{}{}", sigil, key))
    }

    /// Build a lock from a property value.
    ///
    /// `true` locks unconditionally and `false` means "no lock" (`None`).
    /// Text becomes a keyed lock. Numbers are kept as their rendered text.
    pub fn from_value(value: Value) -> Option<Lock> {
        match value {
            Value::Bool(true) => Some(Lock::Unconditional),
            Value::Bool(false) => None,
            Value::Text(s) => Some(Lock::Key(s)),
            n @ Value::Number(_) => Some(Lock::Key(render_value(&n))),
        }
    }

    /// Render the lock as sectioned text.
    ///
    /// Sectioned text has no mapping syntax, so a property lock is written as
    /// `name=value` and reads back as a keyed lock.
    pub fn to_text(&self) -> String {
        match self {
            Lock::Unconditional => render_value(&Value::Bool(true)),
            Lock::Key(raw) => raw.clone(),
            Lock::Property { name, expected } => format!("{}={}", name, render_value(expected)),
        }
    }

    /// The lock as a plain property value, if it has one.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Lock::Unconditional => Some(Value::Bool(true)),
            Lock::Key(raw) => Some(Value::Text(raw.clone())),
            Lock::Property { .. } => None,
        }
    }

    /// Split a keyed lock. Returns `None` for the other lock shapes.
    pub fn key_ref(&self) -> Option<KeyRef<'_>> {
        let Lock::Key(raw) = self else {
            return None;
        };
        let mut chars = raw.chars();
        let Some(first) = chars.next() else {
            return Some(KeyRef::BadSigil(String::new()));
        };
        Some(match Sigil::from_char(first) {
            Some(sigil) => KeyRef::Valid {
                sigil,
                key: chars.as_str(),
            },
            None => KeyRef::BadSigil(first.to_string()),
        })
    }
}

/// Wire shape of a lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawLock {
    Flag(bool),
    Number(f64),
    Key(String),
    Property(BTreeMap<String, Value>),
}

impl TryFrom<RawLock> for Lock {
    type Error = String;

    fn try_from(raw: RawLock) -> Result<Self, Self::Error> {
        match raw {
            RawLock::Flag(true) => Ok(Lock::Unconditional),
            RawLock::Flag(false) => Err("a lock of `false` must be omitted instead".to_string()),
            RawLock::Number(n) => Ok(Lock::Key(render_value(&Value::Number(n)))),
            RawLock::Key(s) => Ok(Lock::Key(s)),
            RawLock::Property(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "a property lock must have exactly one entry, found {}",
                        map.len()
                    ));
                }
                let (name, expected) = map.into_iter().next().ok_or("empty property lock")?;
                Ok(Lock::Property { name, expected })
            }
        }
    }
}

impl From<Lock> for RawLock {
    fn from(lock: Lock) -> Self {
        match lock {
            Lock::Unconditional => RawLock::Flag(true),
            Lock::Key(s) => RawLock::Key(s),
            Lock::Property { name, expected } => {
                RawLock::Property(BTreeMap::from([(name, expected)]))
            }
        }
    }
}
