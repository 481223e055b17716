//! XML element tree for xmltool.
//!
//! Exports are assembled into an owned [`Element`] tree wrapped in a
//! [`Document`]. The document can be serialized with quick-xml, either raw
//! or indented, and parsed back (used for the output of external
//! transformations).
//!
//! # Example
//!
//! ```
//! use xmltool_xml::{Document, Element};
//!
//! let root = Element::new("catalog")
//!     .attr("xmlns:pc", "https://basilicom.de/pimcore")
//!     .child(Element::new("title").text("Hello"));
//!
//! let xml = Document::new(root).to_xml_string(false)?;
//! assert!(xml.ends_with("<catalog xmlns:pc=\"https://basilicom.de/pimcore\"><title>Hello</title></catalog>"));
//! # Ok::<(), xmltool_xml::Error>(())
//! ```

mod document;
mod element;
mod error;
mod name;

pub use document::Document;
pub use element::Element;
pub use error::{Error, Result};
pub use name::encode_xml_name;
