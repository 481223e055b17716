//! Source objects: nodes of the host's hierarchical store.

use rustc_hash::FxHashMap;

use crate::{FieldValue, ObjectId, ObjectKind, Value};

/// One node in the host object tree.
///
/// Children and variants are held as ids in source order; they are resolved
/// through an [`ObjectStore`](crate::ObjectStore).
#[derive(Debug, Clone)]
pub struct SourceObject {
    /// Unique id.
    pub id: ObjectId,
    /// Folder, object or variant.
    pub kind: ObjectKind,
    /// Key, unique among siblings.
    pub key: String,
    /// Class name (`None` for folders).
    pub class_name: Option<String>,
    /// Parent id (`None` for the root).
    pub parent: Option<ObjectId>,
    /// Child objects and folders, in source order.
    pub children: Vec<ObjectId>,
    /// Variant children, in source order.
    pub variants: Vec<ObjectId>,
    values: FxHashMap<String, FieldValue>,
}

impl SourceObject {
    /// Create an object with no values and no children.
    pub fn new(id: ObjectId, kind: ObjectKind, key: impl Into<String>, class_name: Option<String>) -> Self {
        Self {
            id,
            kind,
            key: key.into(),
            class_name,
            parent: None,
            children: Vec::new(),
            variants: Vec::new(),
            values: FxHashMap::default(),
        }
    }

    /// Read a field value, optionally for a language.
    ///
    /// Returns `None` when the field has never been set (or has no value
    /// for the requested language).
    pub fn value(&self, field: &str, language: Option<&str>) -> Option<&Value> {
        self.values.get(field).and_then(|v| v.get(language))
    }

    /// Set a plain field value.
    pub fn set_value(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), FieldValue::Plain(value));
    }

    /// Set the value of a localized field for one language.
    pub fn set_localized_value(&mut self, field: impl Into<String>, language: impl Into<String>, value: Value) {
        let entry = self
            .values
            .entry(field.into())
            .or_insert_with(|| FieldValue::Localized(FxHashMap::default()));

        match entry {
            FieldValue::Localized(map) => {
                map.insert(language.into(), value);
            }
            plain => {
                let mut map = FxHashMap::default();
                map.insert(language.into(), value);
                *plain = FieldValue::Localized(map);
            }
        }
    }
}
