//! Builder for in-memory object stores.
//!
//! # Example
//!
//! ```
//! use xmltool_model::{ClassDefinition, FieldDefinition, ObjectStore, StoreBuilder, Value};
//!
//! let mut builder = StoreBuilder::new();
//! builder.add_class(
//!     ClassDefinition::new("Article").field(FieldDefinition::new("title", "input")),
//! );
//!
//! let root = builder.add_root();
//! let article = builder.add_object(root, "hello", "Article");
//! builder.set(article, "title", Value::from("Hello"));
//!
//! let store = builder.build()?;
//! assert_eq!(store.object_by_path("/hello").unwrap().id, article);
//! # Ok::<(), xmltool_model::Error>(())
//! ```

use rustc_hash::FxHashSet;

use crate::{ClassDefinition, Error, MemoryStore, ObjectId, ObjectKind, Result, SourceObject, Value};

/// An object being built, before linking.
#[derive(Debug, Clone)]
struct ObjectDef {
    id: ObjectId,
    parent: Option<ObjectId>,
    kind: ObjectKind,
    key: String,
    class: Option<String>,
}

/// A pending value assignment.
#[derive(Debug, Clone)]
struct ValueDef {
    id: ObjectId,
    field: String,
    language: Option<String>,
    value: Value,
}

/// Builder for [`MemoryStore`].
///
/// Objects are linked to their parents in insertion order when [`build`](Self::build)
/// is called, so sibling order is the order of the `add_*` calls. All
/// validation happens in `build`.
#[derive(Debug, Default)]
pub struct StoreBuilder {
    classes: Vec<ClassDefinition>,
    languages: Vec<String>,
    objects: Vec<ObjectDef>,
    values: Vec<ValueDef>,
    next_id: ObjectId,
}

impl StoreBuilder {
    /// Create an empty builder. Generated ids start at 1.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Add a valid language for localized fields.
    pub fn language(&mut self, code: impl Into<String>) -> &mut Self {
        self.languages.push(code.into());
        self
    }

    /// Add a class definition.
    pub fn add_class(&mut self, class: ClassDefinition) -> &mut Self {
        self.classes.push(class);
        self
    }

    /// Add the root folder (empty key, path `/`).
    pub fn add_root(&mut self) -> ObjectId {
        let id = self.next_id;
        self.insert(id, None, ObjectKind::Folder, "", None)
    }

    /// Add a folder below `parent`.
    pub fn add_folder(&mut self, parent: ObjectId, key: impl Into<String>) -> ObjectId {
        let id = self.next_id;
        self.insert(id, Some(parent), ObjectKind::Folder, key, None)
    }

    /// Add an object of `class` below `parent`.
    pub fn add_object(&mut self, parent: ObjectId, key: impl Into<String>, class: impl Into<String>) -> ObjectId {
        let id = self.next_id;
        self.insert(id, Some(parent), ObjectKind::Object, key, Some(class.into()))
    }

    /// Add a variant below `parent`. The variant inherits the parent's class.
    pub fn add_variant(&mut self, parent: ObjectId, key: impl Into<String>) -> ObjectId {
        let id = self.next_id;
        self.insert(id, Some(parent), ObjectKind::Variant, key, None)
    }

    /// Add an object with an explicit id.
    ///
    /// Subsequent generated ids continue after the largest id seen so far.
    pub fn insert(
        &mut self,
        id: ObjectId,
        parent: Option<ObjectId>,
        kind: ObjectKind,
        key: impl Into<String>,
        class: Option<String>,
    ) -> ObjectId {
        self.objects.push(ObjectDef {
            id,
            parent,
            kind,
            key: key.into(),
            class,
        });
        self.next_id = self.next_id.max(id + 1);
        id
    }

    /// Set a plain field value.
    pub fn set(&mut self, id: ObjectId, field: impl Into<String>, value: Value) -> &mut Self {
        self.values.push(ValueDef {
            id,
            field: field.into(),
            language: None,
            value,
        });
        self
    }

    /// Set a localized field value for one language.
    pub fn set_localized(
        &mut self,
        id: ObjectId,
        field: impl Into<String>,
        language: impl Into<String>,
        value: Value,
    ) -> &mut Self {
        self.values.push(ValueDef {
            id,
            field: field.into(),
            language: Some(language.into()),
            value,
        });
        self
    }

    /// Validate and link everything into a [`MemoryStore`].
    pub fn build(self) -> Result<MemoryStore> {
        let mut store = MemoryStore {
            languages: self.languages,
            ..Default::default()
        };

        for class in self.classes {
            store.class_index.insert(class.name.clone(), store.classes.len());
            store.classes.push(class);
        }

        // Pass 1: register objects
        for def in &self.objects {
            if store.index.contains_key(&def.id) {
                return Err(Error::DuplicateId(def.id));
            }

            let mut object = SourceObject::new(def.id, def.kind, def.key.clone(), def.class.clone());
            object.parent = def.parent;

            match (def.parent, store.root) {
                (None, Some(first)) => {
                    return Err(Error::MultipleRoots {
                        first,
                        second: def.id,
                    })
                }
                (None, None) => store.root = Some(def.id),
                _ => {}
            }

            store.index.insert(def.id, store.objects.len());
            store.objects.push(object);
        }

        // Pass 2: link children in insertion order
        for def in &self.objects {
            let Some(parent) = def.parent else { continue };
            let parent_index = *store
                .index
                .get(&parent)
                .ok_or(Error::UnknownParent { id: def.id, parent })?;

            let parent_object = &mut store.objects[parent_index];
            if def.kind == ObjectKind::Variant {
                parent_object.variants.push(def.id);
            } else {
                parent_object.children.push(def.id);
            }
        }

        // Pass 3: resolve and validate classes (variants inherit from their parent chain)
        for i in 0..store.objects.len() {
            if store.objects[i].kind.is_folder() {
                store.objects[i].class_name = None;
                continue;
            }

            let class = resolve_class(&store, i).ok_or(Error::MissingClass(store.objects[i].id))?;
            if !store.class_index.contains_key(&class) {
                return Err(Error::UnknownClass {
                    id: store.objects[i].id,
                    class,
                });
            }
            store.objects[i].class_name = Some(class);
        }

        // Pass 4: values
        for def in self.values {
            let index = *store.index.get(&def.id).ok_or(Error::UnknownObject(def.id))?;
            let object = &mut store.objects[index];
            match def.language {
                Some(language) => object.set_localized_value(def.field, language, def.value),
                None => object.set_value(def.field, def.value),
            }
        }

        Ok(store)
    }
}

/// Walk up the parent chain until an object with a class is found.
fn resolve_class(store: &MemoryStore, index: usize) -> Option<String> {
    let mut current = &store.objects[index];
    let mut seen = FxHashSet::default();

    loop {
        if let Some(class) = &current.class_name {
            return Some(class.clone());
        }
        if current.kind != ObjectKind::Variant || !seen.insert(current.id) {
            return None;
        }
        current = &store.objects[*store.index.get(&current.parent?)?];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectStore;

    #[test]
    fn test_variant_inherits_class() {
        let mut builder = StoreBuilder::new();
        builder.add_class(ClassDefinition::new("Product"));
        let root = builder.add_root();
        let product = builder.add_object(root, "shirt", "Product");
        let red = builder.add_variant(product, "red");
        let small = builder.add_variant(red, "small");

        let store = builder.build().unwrap();
        assert_eq!(store.object(red).unwrap().class_name.as_deref(), Some("Product"));
        assert_eq!(store.object(small).unwrap().class_name.as_deref(), Some("Product"));
        assert_eq!(store.object(product).unwrap().variants, vec![red]);
        assert!(store.object(product).unwrap().children.is_empty());
    }

    #[test]
    fn test_unknown_class() {
        let mut builder = StoreBuilder::new();
        let root = builder.add_root();
        builder.add_object(root, "x", "Nope");
        assert!(matches!(builder.build(), Err(Error::UnknownClass { .. })));
    }

    #[test]
    fn test_variant_below_folder() {
        let mut builder = StoreBuilder::new();
        let root = builder.add_root();
        builder.add_variant(root, "orphan");
        assert!(matches!(builder.build(), Err(Error::MissingClass(2))));
    }

    #[test]
    fn test_unknown_parent() {
        let mut builder = StoreBuilder::new();
        builder.add_root();
        builder.add_folder(99, "lost");
        assert!(matches!(builder.build(), Err(Error::UnknownParent { id: 2, parent: 99 })));
    }

    #[test]
    fn test_duplicate_and_roots() {
        let mut builder = StoreBuilder::new();
        builder.insert(5, None, ObjectKind::Folder, "", None);
        builder.insert(5, Some(5), ObjectKind::Folder, "a", None);
        assert!(matches!(builder.build(), Err(Error::DuplicateId(5))));

        let mut builder = StoreBuilder::new();
        builder.add_root();
        builder.add_root();
        assert!(matches!(builder.build(), Err(Error::MultipleRoots { first: 1, second: 2 })));
    }

    #[test]
    fn test_explicit_ids_advance_counter() {
        let mut builder = StoreBuilder::new();
        builder.insert(10, None, ObjectKind::Folder, "", None);
        let next = builder.add_folder(10, "a");
        assert_eq!(next, 11);
    }

    #[test]
    fn test_value_on_unknown_object() {
        let mut builder = StoreBuilder::new();
        builder.add_root();
        builder.set(42, "title", Value::from("x"));
        assert!(matches!(builder.build(), Err(Error::UnknownObject(42))));
    }
}
