//! Object store access.
//!
//! The exporter reads everything it needs (objects, class schemas, the
//! language list) through the [`ObjectStore`] trait. [`MemoryStore`] is the
//! in-memory implementation used by the CLI and the tests.

use rustc_hash::FxHashMap;

use crate::{ClassDefinition, ObjectId, SourceObject};

/// Read-only access to a hierarchical object store.
pub trait ObjectStore {
    /// Look up an object by id.
    fn object(&self, id: ObjectId) -> Option<&SourceObject>;

    /// Look up an object by its slash-separated key path (`/` is the root).
    fn object_by_path(&self, path: &str) -> Option<&SourceObject>;

    /// Look up a class definition by name.
    fn class(&self, name: &str) -> Option<&ClassDefinition>;

    /// Valid languages for localized fields, in configured order.
    fn languages(&self) -> &[String];

    /// Child objects and folders of `object`, in source order.
    fn children<'a>(&'a self, object: &'a SourceObject) -> Vec<&'a SourceObject> {
        object.children.iter().filter_map(|&id| self.object(id)).collect()
    }

    /// Variant children of `object`, in source order.
    fn variants<'a>(&'a self, object: &'a SourceObject) -> Vec<&'a SourceObject> {
        object.variants.iter().filter_map(|&id| self.object(id)).collect()
    }
}

/// In-memory object store.
///
/// Build one with [`StoreBuilder`](crate::StoreBuilder) or load a JSON
/// snapshot with `MemoryStore::from_json` (requires the `json` feature).
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) objects: Vec<SourceObject>,
    pub(crate) index: FxHashMap<ObjectId, usize>,
    pub(crate) classes: Vec<ClassDefinition>,
    pub(crate) class_index: FxHashMap<String, usize>,
    pub(crate) languages: Vec<String>,
    pub(crate) root: Option<ObjectId>,
}

impl MemoryStore {
    /// Get the root object, if any.
    pub fn root(&self) -> Option<&SourceObject> {
        self.root.and_then(|id| self.object(id))
    }

    /// Number of objects in the store.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over all objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SourceObject> {
        self.objects.iter()
    }

    /// All class definitions in insertion order.
    pub fn classes(&self) -> &[ClassDefinition] {
        &self.classes
    }

    /// Build the key path of an object (`/` for the root).
    pub fn path(&self, id: ObjectId) -> Option<String> {
        let mut keys = Vec::new();
        let mut current = self.object(id)?;

        while let Some(parent) = current.parent {
            keys.push(current.key.as_str());
            current = self.object(parent)?;
        }

        keys.reverse();
        Some(format!("/{}", keys.join("/")))
    }
}

impl ObjectStore for MemoryStore {
    fn object(&self, id: ObjectId) -> Option<&SourceObject> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    fn object_by_path(&self, path: &str) -> Option<&SourceObject> {
        let mut current = self.root()?;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .children
                .iter()
                .chain(current.variants.iter())
                .filter_map(|&id| self.object(id))
                .find(|child| child.key == segment)?;
        }

        Some(current)
    }

    fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.class_index.get(name).map(|&i| &self.classes[i])
    }

    fn languages(&self) -> &[String] {
        &self.languages
    }
}
