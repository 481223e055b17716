//! Type-driven export of object trees to XML.
//!
//! The exporter walks a host object tree, serializes every field according
//! to its declared type tag and assembles one XML document.
//!
//! # Quick Start
//!
//! ```
//! use xmltool_export::{ExportOptions, Exporter};
//! use xmltool_model::{ClassDefinition, FieldDefinition, StoreBuilder, Value};
//!
//! let mut builder = StoreBuilder::new();
//! builder.add_class(ClassDefinition::new("Article").field(FieldDefinition::new("title", "input")));
//! let root = builder.add_root();
//! let hello = builder.add_object(root, "hello", "Article");
//! builder.set(hello, "title", Value::from("Hello"));
//! let store = builder.build()?;
//!
//! let export = Exporter::new().export_path(&store, "/hello", &ExportOptions::new())?;
//! let xml = export.to_xml_string(false)?;
//! assert!(xml.contains("<title>Hello</title>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Dispatch** ([`FieldRegistry`]): maps type tags to [`FieldHandler`]s;
//!   unknown tags become `skipped` markers plus a [`Diagnostic`]
//! - **Traversal** ([`Exporter`], [`ExportContext`]): depth-first export of
//!   children, variants and relations into [`ExportNode`]s
//! - **Relation cache** ([`RelationCache`]): objects reached a second time
//!   through a relation are written with identity attributes only
//! - **Assembly** ([`assemble`]): nodes to elements, using the `pc:`
//!   container elements for children, variants and relation metadata
//! - **Post-processing** ([`PostProcessor`]): optional XSLT pass over the
//!   assembled document

mod assemble;
mod cache;
mod diagnostics;
mod dispatch;
mod error;
mod exporter;
mod handlers;
mod node;
mod options;
mod postprocess;

pub use assemble::{assemble, node_element};
pub use cache::RelationCache;
pub use diagnostics::Diagnostic;
pub use dispatch::{FieldHandler, FieldRegistry, FieldRequest, RelationResolver};
pub use error::{Error, Result};
pub use exporter::{Export, ExportContext, Exporter, NodeExport};
pub use handlers::{DateHandler, MetadataRelationHandler, NumericHandler, RelationHandler, TextHandler};
pub use node::{
    ClassGroups, ExportNode, ExportValue, NodeAttributes, RelationEntry, CHILDREN_ELEMENT, FOLDER_CLASS,
    META_ELEMENT, PC_NAMESPACE, PC_NAMESPACE_ATTRIBUTE, RELATION_ELEMENT, VARIANTS_ELEMENT,
};
pub use options::ExportOptions;
pub use postprocess::{PostProcessor, XsltProcessor};
