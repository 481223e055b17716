//! Xmltool - export hierarchical object trees to XML.
//!
//! This crate provides a unified interface to the xmltool crates.
//!
//! # Crates
//!
//! - [`xmltool_model`] - Object store model (objects, class schemas, values)
//! - [`xmltool_xml`] - XML element tree, serialization and parsing
//! - [`xmltool_export`] - Field dispatch, tree export and post-processing
//!
//! # Example
//!
//! ```no_run
//! use xmltool::prelude::*;
//!
//! // Load a store snapshot
//! let store = MemoryStore::open("store.json")?;
//!
//! // Export everything below /catalog, variants included
//! let options = ExportOptions::new().include_variants(true).root_element_name("catalog");
//! let export = Exporter::new().export_path(&store, "/catalog", &options)?;
//!
//! for diagnostic in &export.diagnostics {
//!     eprintln!("warning: {}", diagnostic);
//! }
//! println!("{}", export.to_xml_string(true)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use xmltool_export as export;
pub use xmltool_model as model;
pub use xmltool_xml as xml;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use xmltool_export::{Diagnostic, Export, ExportOptions, Exporter, FieldHandler, FieldRegistry, PostProcessor};
    pub use xmltool_model::{ClassDefinition, FieldDefinition, MemoryStore, ObjectStore, StoreBuilder, Value};
    pub use xmltool_xml::{Document, Element};
}

pub use xmltool_export::Exporter;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
