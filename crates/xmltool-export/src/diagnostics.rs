//! Non-fatal problems found during an export.

use std::fmt;

use xmltool_model::ObjectId;

/// A problem that did not abort the export.
///
/// The affected field is still written (as a skipped marker or an empty
/// element) and the diagnostic is returned next to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No handler is registered for a field type.
    UnsupportedFieldType {
        object: ObjectId,
        field: String,
        field_type: String,
    },
    /// A relation field holds a value that is not a list of relations.
    NotIterable { object: ObjectId, field: String },
    /// A relation points to an object the store does not have.
    MissingRelationTarget {
        object: ObjectId,
        field: String,
        target: ObjectId,
    },
}

impl Diagnostic {
    /// Object the diagnostic was raised for.
    pub fn object(&self) -> ObjectId {
        match self {
            Diagnostic::UnsupportedFieldType { object, .. }
            | Diagnostic::NotIterable { object, .. }
            | Diagnostic::MissingRelationTarget { object, .. } => *object,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedFieldType {
                object,
                field,
                field_type,
            } => write!(f, "object {}: field '{}' has unsupported type '{}'", object, field, field_type),
            Diagnostic::NotIterable { object, field } => {
                write!(f, "object {}: relation field '{}' is not a list", object, field)
            }
            Diagnostic::MissingRelationTarget { object, field, target } => {
                write!(f, "object {}: field '{}' references missing object {}", object, field, target)
            }
        }
    }
}
