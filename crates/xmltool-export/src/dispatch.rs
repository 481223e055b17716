//! Field dispatch: maps field type tags to handlers.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use xmltool_model::{tags, FieldDefinition, ObjectId, SourceObject, Value};

use crate::handlers::{DateHandler, MetadataRelationHandler, NumericHandler, RelationHandler, TextHandler};
use crate::{Diagnostic, ExportNode, ExportValue, Result};

/// One field of one object, read for an optional language.
#[derive(Debug, Clone, Copy)]
pub struct FieldRequest<'a> {
    pub object: &'a SourceObject,
    pub field: &'a FieldDefinition,
    /// Set while serializing the members of a localized container.
    pub language: Option<&'a str>,
}

impl<'a> FieldRequest<'a> {
    /// Read the field value for the request language.
    pub fn value(&self) -> Option<&'a Value> {
        self.object.value(&self.field.name, self.language)
    }

    /// Diagnostic for a relation value that is not a list.
    pub fn not_iterable(&self) -> Diagnostic {
        Diagnostic::NotIterable {
            object: self.object.id,
            field: self.field.name.clone(),
        }
    }

    /// Diagnostic for a relation to an id the store does not have.
    pub fn missing_target(&self, target: ObjectId) -> Diagnostic {
        Diagnostic::MissingRelationTarget {
            object: self.object.id,
            field: self.field.name.clone(),
            target,
        }
    }
}

/// Callback into the running export, used by relation handlers.
pub trait RelationResolver {
    /// Export a referenced object as a relation target.
    ///
    /// Returns `None` if the store has no object with that id.
    fn export_reference(&mut self, id: ObjectId) -> Result<Option<ExportNode>>;

    /// Record a non-fatal problem.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Serializes the value of one field type.
pub trait FieldHandler: Send + Sync {
    /// Produce the serialized value of the requested field.
    fn export(&self, request: &FieldRequest<'_>, resolver: &mut dyn RelationResolver) -> Result<ExportValue>;
}

/// Registry of field handlers, keyed by type tag.
///
/// Localized containers are not handled by a [`FieldHandler`]; they are a
/// fan-out directive the tree exporter expands once per language. Their tags
/// are tracked separately.
#[derive(Clone)]
pub struct FieldRegistry {
    handlers: FxHashMap<String, Arc<dyn FieldHandler>>,
    localized: FxHashSet<String>,
}

impl FieldRegistry {
    /// Create a registry without any handlers.
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
            localized: FxHashSet::default(),
        }
    }

    /// Register a handler for a type tag, replacing any previous one.
    pub fn register(&mut self, tag: impl Into<String>, handler: impl FieldHandler + 'static) -> &mut Self {
        self.handlers.insert(tag.into(), Arc::new(handler));
        self
    }

    /// Make `alias` dispatch to the handler registered for `tag`.
    ///
    /// Does nothing if `tag` has no handler.
    pub fn alias(&mut self, alias: impl Into<String>, tag: &str) -> &mut Self {
        if let Some(handler) = self.handlers.get(tag).cloned() {
            self.handlers.insert(alias.into(), handler);
        }
        self
    }

    /// Treat a type tag as a localized container.
    pub fn register_localized(&mut self, tag: impl Into<String>) -> &mut Self {
        self.localized.insert(tag.into());
        self
    }

    /// Get the handler for a type tag.
    pub fn get(&self, tag: &str) -> Option<&dyn FieldHandler> {
        self.handlers.get(tag).map(|h| &**h)
    }

    /// Check if a type tag has a handler.
    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Check if a type tag is a localized container.
    pub fn is_localized(&self, tag: &str) -> bool {
        self.localized.contains(tag)
    }

    /// All registered type tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Serialize one field.
    ///
    /// A type tag without a handler yields [`ExportValue::Skipped`] and an
    /// [`Diagnostic::UnsupportedFieldType`]; it never fails the export.
    pub fn dispatch(&self, request: &FieldRequest<'_>, resolver: &mut dyn RelationResolver) -> Result<ExportValue> {
        match self.get(&request.field.field_type) {
            Some(handler) => handler.export(request, resolver),
            None => {
                resolver.report(Diagnostic::UnsupportedFieldType {
                    object: request.object.id,
                    field: request.field.name.clone(),
                    field_type: request.field.field_type.clone(),
                });
                Ok(ExportValue::Skipped {
                    field_type: request.field.field_type.clone(),
                })
            }
        }
    }
}

impl Default for FieldRegistry {
    /// Registry with handlers for all built-in type tags and their aliases.
    fn default() -> Self {
        let mut registry = Self::empty();

        for tag in [
            tags::INPUT,
            tags::IMAGE,
            tags::SELECT,
            tags::TEXTAREA,
            tags::WYSIWYG,
            tags::RGBA_COLOR,
            tags::COLOR,
        ] {
            registry.register(tag, TextHandler);
        }
        registry.alias(tags::PIMCORE_RGBA_COLOR, tags::RGBA_COLOR);

        registry.register(tags::NUMERIC, NumericHandler);
        registry.register(tags::DATE, DateHandler);
        registry.register(tags::DATETIME, DateHandler);

        registry.register(tags::RELATION, RelationHandler);
        registry.alias(tags::OBJECTS, tags::RELATION);
        registry.alias(tags::PIMCORE_RELATION, tags::RELATION);

        registry.register(tags::METADATA_RELATION, MetadataRelationHandler);
        registry.alias(tags::OBJECTS_METADATA, tags::METADATA_RELATION);
        registry.alias(tags::PIMCORE_METADATA_RELATION, tags::METADATA_RELATION);
        registry.alias(tags::PIMCORE_OBJECTS_METADATA, tags::METADATA_RELATION);

        registry.register_localized(tags::LOCALIZED_FIELDS);
        registry.register_localized(tags::PIMCORE_LOCALIZED_FIELDS);

        registry
    }
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("handlers", &self.tags())
            .field("localized", &self.localized)
            .finish()
    }
}
