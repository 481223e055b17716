//! Intermediate representation of exported objects.
//!
//! The tree exporter produces [`ExportNode`]s; the assembler turns them into
//! XML elements. Everything here is ordered: field order follows the schema,
//! class groups follow first-seen order and nodes inside a group follow
//! source order.

use xmltool_model::{ObjectId, ObjectKind};

/// Namespace bound to the `pc` prefix on the root element.
pub const PC_NAMESPACE: &str = "https://basilicom.de/pimcore";
/// Attribute declaring the `pc` namespace.
pub const PC_NAMESPACE_ATTRIBUTE: &str = "xmlns:pc";
/// Container element for child objects.
pub const CHILDREN_ELEMENT: &str = "pc:children";
/// Container element for variants.
pub const VARIANTS_ELEMENT: &str = "pc:variants";
/// Element wrapping one relation-with-metadata entry.
pub const RELATION_ELEMENT: &str = "pc:relation";
/// Element holding relation metadata.
pub const META_ELEMENT: &str = "pc:meta";
/// Class name reported for folders.
pub const FOLDER_CLASS: &str = "Folder";

/// Identity and classification attributes of an exported object.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttributes {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub key: String,
    pub class: String,
    pub is_variant_leaf: bool,
    pub is_object_leaf: bool,
    /// Additional attributes written after the standard ones (e.g. the root
    /// namespace declaration).
    pub extra: Vec<(String, String)>,
}

impl NodeAttributes {
    /// Attributes as ordered name/value pairs.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("id".to_string(), self.id.to_string()),
            ("type".to_string(), self.kind.as_str().to_string()),
            ("key".to_string(), self.key.clone()),
            ("class".to_string(), self.class.clone()),
            ("is-variant-leaf".to_string(), bool_str(self.is_variant_leaf).to_string()),
            ("is-object-leaf".to_string(), bool_str(self.is_object_leaf).to_string()),
        ];
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// One exported object.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNode {
    pub attributes: NodeAttributes,
    /// Serialized fields in schema order.
    pub fields: Vec<(String, ExportValue)>,
    /// Exported children, grouped by class.
    pub children: ClassGroups,
    /// Exported variants, grouped by class.
    pub variants: ClassGroups,
}

impl ExportNode {
    /// Resolved class name (`Folder` for folders).
    pub fn class(&self) -> &str {
        &self.attributes.class
    }

    /// Look up a serialized field by name.
    pub fn field(&self, name: &str) -> Option<&ExportValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Depth of the exported object tree (a node without children or
    /// variants has depth 1).
    pub fn depth(&self) -> usize {
        let below = self
            .children
            .iter()
            .chain(self.variants.iter())
            .map(ExportNode::depth)
            .max()
            .unwrap_or(0);
        1 + below
    }
}

/// Exported nodes grouped by class name.
///
/// Groups appear in the order their class was first seen; nodes within a
/// group keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassGroups {
    groups: Vec<(String, Vec<ExportNode>)>,
}

impl ClassGroups {
    /// Create an empty set of groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node to the group of its class.
    pub fn push(&mut self, node: ExportNode) {
        match self.groups.iter_mut().find(|(class, _)| class == node.class()) {
            Some((_, nodes)) => nodes.push(node),
            None => self.groups.push((node.class().to_string(), vec![node])),
        }
    }

    /// Check if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of nodes across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, nodes)| nodes.len()).sum()
    }

    /// The groups, in first-seen order.
    pub fn groups(&self) -> &[(String, Vec<ExportNode>)] {
        &self.groups
    }

    /// Nodes of one class.
    pub fn get(&self, class: &str) -> Option<&[ExportNode]> {
        self.groups
            .iter()
            .find(|(c, _)| c == class)
            .map(|(_, nodes)| nodes.as_slice())
    }

    /// Iterate over all nodes, group by group.
    pub fn iter(&self) -> impl Iterator<Item = &ExportNode> {
        self.groups.iter().flat_map(|(_, nodes)| nodes.iter())
    }
}

/// One relation-with-metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationEntry {
    /// The referenced object.
    pub node: ExportNode,
    /// Metadata, passed through unchanged.
    pub metadata: Vec<(String, String)>,
}

/// A serialized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    /// No value; written as an empty element.
    Null,
    /// Character data, optionally tagged with the language it was read for.
    Text { text: String, language: Option<String> },
    /// Number or date in its canonical string form.
    Scalar(String),
    /// Field type without a handler.
    Skipped { field_type: String },
    /// Referenced objects grouped by class.
    Relations(ClassGroups),
    /// Referenced objects with metadata.
    MetadataRelations(Vec<RelationEntry>),
    /// Per-language values of a localized container, in language order.
    Localized(Vec<(String, Vec<(String, ExportValue)>)>),
}

impl ExportValue {
    /// Plain text value without language.
    pub fn text(text: impl Into<String>) -> Self {
        ExportValue::Text {
            text: text.into(),
            language: None,
        }
    }

    /// Get the character data of a text or scalar value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ExportValue::Text { text, .. } | ExportValue::Scalar(text) => Some(text),
            _ => None,
        }
    }
}
