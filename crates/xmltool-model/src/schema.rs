//! Class schema: field definitions and class definitions.

/// Type tag of the localized field container.
///
/// A field with this tag holds nested field definitions whose values are
/// stored once per language.
pub const LOCALIZED_FIELDS: &str = "localized-fields";

/// Well-known field type tags.
///
/// Pimcore spellings are kept as aliases so snapshots taken from a Pimcore
/// class export can be used unchanged.
pub mod tags {
    pub const INPUT: &str = "input";
    pub const IMAGE: &str = "image";
    pub const SELECT: &str = "select";
    pub const TEXTAREA: &str = "textarea";
    pub const WYSIWYG: &str = "wysiwyg";
    pub const RGBA_COLOR: &str = "rgba-color";
    pub const COLOR: &str = "color";
    pub const NUMERIC: &str = "numeric";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";
    pub const RELATION: &str = "many-to-many-relation";
    pub const METADATA_RELATION: &str = "advanced-many-to-many-relation";
    pub const LOCALIZED_FIELDS: &str = super::LOCALIZED_FIELDS;

    /// Legacy alias of [`RELATION`].
    pub const OBJECTS: &str = "objects";
    /// Legacy alias of [`METADATA_RELATION`].
    pub const OBJECTS_METADATA: &str = "objects-metadata";

    pub const PIMCORE_RGBA_COLOR: &str = "rgbaColor";
    pub const PIMCORE_RELATION: &str = "manyToManyObjectRelation";
    pub const PIMCORE_METADATA_RELATION: &str = "advancedManyToManyObjectRelation";
    pub const PIMCORE_OBJECTS_METADATA: &str = "objectsMetadata";
    pub const PIMCORE_LOCALIZED_FIELDS: &str = "localizedfields";

    /// Check if `tag` names an object relation (any spelling).
    pub fn is_relation(tag: &str) -> bool {
        matches!(tag, RELATION | OBJECTS | PIMCORE_RELATION)
    }

    /// Check if `tag` names a relation with metadata (any spelling).
    pub fn is_metadata_relation(tag: &str) -> bool {
        matches!(
            tag,
            METADATA_RELATION | OBJECTS_METADATA | PIMCORE_METADATA_RELATION | PIMCORE_OBJECTS_METADATA
        )
    }

    /// Check if `tag` names a date type.
    pub fn is_date(tag: &str) -> bool {
        matches!(tag, DATE | DATETIME)
    }

    /// Check if `tag` names the localized field container (any spelling).
    pub fn is_localized(tag: &str) -> bool {
        matches!(tag, LOCALIZED_FIELDS | PIMCORE_LOCALIZED_FIELDS)
    }
}

/// Describes one attribute of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field name, used as the value key and the XML element name.
    pub name: String,
    /// Field type tag, e.g. `input`, `date`, `many-to-many-relation`.
    pub field_type: String,
    /// Nested definitions (only for localized field containers).
    pub children: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// Create a leaf field definition.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            children: Vec::new(),
        }
    }

    /// Create a localized field container holding `children`.
    pub fn localized(name: impl Into<String>, children: impl IntoIterator<Item = FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            field_type: LOCALIZED_FIELDS.to_string(),
            children: children.into_iter().collect(),
        }
    }

    /// Check if this definition is a localized field container.
    #[inline]
    pub fn is_localized(&self) -> bool {
        tags::is_localized(&self.field_type)
    }

    /// Find the definition for `name`, descending into localized containers.
    ///
    /// Returns the definition and whether it was found inside a localized container.
    pub fn find<'a>(fields: &'a [FieldDefinition], name: &str) -> Option<(&'a FieldDefinition, bool)> {
        for field in fields {
            if field.name == name && !field.is_localized() {
                return Some((field, false));
            }
            if field.is_localized() {
                if let Some((inner, _)) = Self::find(&field.children, name) {
                    return Some((inner, true));
                }
            }
        }
        None
    }
}

/// A class: a name and its ordered field definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    /// Class name.
    pub name: String,
    /// Field definitions in schema order.
    pub fields: Vec<FieldDefinition>,
}

impl ClassDefinition {
    /// Create a class without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field definition.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Find a field by name, looking inside localized containers as well.
    pub fn find_field(&self, name: &str) -> Option<(&FieldDefinition, bool)> {
        FieldDefinition::find(&self.fields, name)
    }
}
