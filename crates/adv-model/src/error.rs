//! Errors from the accessor operations on a document.

/// Errors raised when editing a document through its accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("No such object: {0}")]
    NoSuchObject(String),

    #[error("ID {0} already in use")]
    DuplicateId(String),

    #[error("{0} is a reserved word")]
    ReservedId(String),

    #[error("Object IDs cannot be empty")]
    EmptyId,
}
