//! Host object store model for xmltool.
//!
//! The exporter never owns the data it exports. This crate describes what it
//! reads from the host:
//!
//! - [`SourceObject`] - a folder, object or variant in the object tree
//! - [`ClassDefinition`] / [`FieldDefinition`] - the schema of a class
//! - [`Value`] - field values, including relations
//! - [`ObjectStore`] - read access to objects, classes and languages
//!
//! [`MemoryStore`] implements [`ObjectStore`] in memory. It is built with
//! [`StoreBuilder`] or, with the `json` feature, loaded from a JSON snapshot.

mod builder;
mod error;
mod object;
mod schema;
mod store;
mod types;
mod value;

#[cfg(feature = "json")]
mod json;

pub use builder::StoreBuilder;
pub use error::{Error, Result};
pub use object::SourceObject;
pub use schema::{tags, ClassDefinition, FieldDefinition, LOCALIZED_FIELDS};
pub use store::{MemoryStore, ObjectStore};
pub use types::{ObjectId, ObjectKind};
pub use value::{FieldValue, MetadataRelation, Value};

#[cfg(feature = "json")]
pub use json::parse_date;
