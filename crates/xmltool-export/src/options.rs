//! Per-export options.

use std::path::PathBuf;

/// Options for a single export call.
///
/// Options are read-only while an export runs; build a new value for each
/// call instead of sharing mutable state between exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Expand variants under every exported object, including objects
    /// reached through relations.
    pub include_variants: bool,
    /// Export related objects without their fields.
    pub omit_relation_object_fields: bool,
    /// Stylesheet applied to the assembled document.
    pub post_process: Option<PathBuf>,
    /// Name of the document root element.
    pub root_element_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_variants: false,
            omit_relation_object_fields: false,
            post_process: None,
            root_element_name: "root".to_string(),
        }
    }
}

impl ExportOptions {
    /// Default options: no variants, full relation objects, no post-processing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether variants are expanded.
    pub fn include_variants(mut self, include: bool) -> Self {
        self.include_variants = include;
        self
    }

    /// Set whether related objects are exported without fields.
    pub fn omit_relation_object_fields(mut self, omit: bool) -> Self {
        self.omit_relation_object_fields = omit;
        self
    }

    /// Apply a stylesheet to the assembled document.
    pub fn post_process(mut self, stylesheet: impl Into<PathBuf>) -> Self {
        self.post_process = Some(stylesheet.into());
        self
    }

    /// Set the name of the document root element.
    pub fn root_element_name(mut self, name: impl Into<String>) -> Self {
        self.root_element_name = name.into();
        self
    }
}
