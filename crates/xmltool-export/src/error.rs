//! Error types for exports.

use thiserror::Error;
use xmltool_model::ObjectId;
use xmltool_xml::{Document, Element};

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum Error {
    /// No object at the requested path or id.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// An object references a class the store does not define.
    #[error("class '{class}' of object {object} not found")]
    ClassNotFound { object: ObjectId, class: String },

    /// The post-processing step failed.
    #[error("post-processing failed: {0}")]
    PostProcess(String),

    /// XML serialization error.
    #[error("{0}")]
    Xml(#[from] xmltool_xml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Status code reported to callers: 404 for a missing root, 500 otherwise.
    pub fn code(&self) -> u16 {
        match self {
            Error::ObjectNotFound(_) => 404,
            _ => 500,
        }
    }

    /// Render the error as `<error><message/><code/></error>`.
    pub fn to_document(&self) -> Document {
        Document::new(
            Element::new("error")
                .child(Element::new("message").text(self.to_string()))
                .child(Element::new("code").text(self.code().to_string())),
        )
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, Error>;
