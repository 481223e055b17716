//! Document assembly: turns exported nodes into XML elements.

use xmltool_xml::{encode_xml_name, Document, Element};

use crate::node::{CHILDREN_ELEMENT, META_ELEMENT, RELATION_ELEMENT, VARIANTS_ELEMENT};
use crate::{ClassGroups, ExportNode, ExportValue};

/// Assemble a document whose root element is `node`, named `root_name`.
pub fn assemble(node: &ExportNode, root_name: &str) -> Document {
    Document::new(node_element(root_name, node))
}

/// Build the element of one exported node.
pub fn node_element(name: &str, node: &ExportNode) -> Element {
    let mut element = Element::new(encode_xml_name(name));
    element.attributes = node.attributes.pairs();

    for (field, value) in &node.fields {
        element.children.push(value_element(field, value));
    }

    if !node.children.is_empty() {
        element.children.push(groups_element(CHILDREN_ELEMENT, &node.children));
    }
    if !node.variants.is_empty() {
        element.children.push(groups_element(VARIANTS_ELEMENT, &node.variants));
    }

    element
}

fn groups_element(name: &str, groups: &ClassGroups) -> Element {
    Element::new(name).children(group_elements(groups))
}

fn group_elements(groups: &ClassGroups) -> impl Iterator<Item = Element> + '_ {
    groups
        .groups()
        .iter()
        .flat_map(|(class, nodes)| nodes.iter().map(move |node| node_element(class, node)))
}

fn value_element(name: &str, value: &ExportValue) -> Element {
    let element = Element::new(encode_xml_name(name));

    match value {
        ExportValue::Null => element,
        ExportValue::Text { text, language } => {
            let element = element.text(text.as_str());
            match language {
                Some(language) => element.attr("language", language.as_str()),
                None => element,
            }
        }
        ExportValue::Scalar(text) => element.text(text.as_str()),
        ExportValue::Skipped { field_type } => element.attr("skipped", "true").attr("fieldtype", field_type.as_str()),
        ExportValue::Relations(groups) => element.children(group_elements(groups)),
        ExportValue::MetadataRelations(entries) => element.children(entries.iter().map(|entry| {
            let meta = Element::new(META_ELEMENT).children(
                entry
                    .metadata
                    .iter()
                    .map(|(key, value)| Element::new(encode_xml_name(key)).text(value.as_str())),
            );
            Element::new(RELATION_ELEMENT)
                .child(node_element(entry.node.class(), &entry.node))
                .child(meta)
        })),
        ExportValue::Localized(languages) => element.children(languages.iter().map(|(language, fields)| {
            Element::new(encode_xml_name(language))
                .children(fields.iter().map(|(field, value)| value_element(field, value)))
        })),
    }
}
