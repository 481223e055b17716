//! Error types for the host store model.

use thiserror::Error;

use crate::ObjectId;

/// Errors that can occur when building or loading an object store.
#[derive(Debug, Error)]
pub enum Error {
    /// An object id was registered twice.
    #[error("duplicate object id: {0}")]
    DuplicateId(ObjectId),

    /// A value was set on an object that does not exist.
    #[error("unknown object id: {0}")]
    UnknownObject(ObjectId),

    /// An object refers to a parent that does not exist.
    #[error("object {id} refers to unknown parent {parent}")]
    UnknownParent { id: ObjectId, parent: ObjectId },

    /// An object refers to a class that was never defined.
    #[error("object {id} uses unknown class '{class}'")]
    UnknownClass { id: ObjectId, class: String },

    /// A non-folder object has no class.
    #[error("object {0} has no class")]
    MissingClass(ObjectId),

    /// More than one object claims to be the root.
    #[error("store has more than one root object ({first} and {second})")]
    MultipleRoots { first: ObjectId, second: ObjectId },

    /// Unknown object kind name.
    #[error("invalid object kind: {0}")]
    InvalidKind(String),

    /// A field value could not be converted for its declared type.
    #[error("invalid value for field '{field}' of object {id}: {reason}")]
    InvalidValue {
        id: ObjectId,
        field: String,
        reason: String,
    },

    /// JSON decoding error.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
