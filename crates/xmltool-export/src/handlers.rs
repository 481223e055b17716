//! Built-in field handlers.

use xmltool_model::{MetadataRelation, ObjectId, Value};

use crate::dispatch::{FieldHandler, FieldRequest, RelationResolver};
use crate::{ClassGroups, ExportValue, RelationEntry, Result};

/// Text-like fields (`input`, `textarea`, `wysiwyg`, `select`, ...).
///
/// Without a language an empty value is written as null. Inside a localized
/// container the value is always a text node tagged with its language.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHandler;

impl FieldHandler for TextHandler {
    fn export(&self, request: &FieldRequest<'_>, _: &mut dyn RelationResolver) -> Result<ExportValue> {
        let text = request.value().map(Value::to_string).unwrap_or_default();

        match request.language {
            Some(language) => Ok(ExportValue::Text {
                text,
                language: Some(language.to_string()),
            }),
            None if text.is_empty() => Ok(ExportValue::Null),
            None => Ok(ExportValue::text(text)),
        }
    }
}

/// Numeric fields: the raw value as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericHandler;

impl FieldHandler for NumericHandler {
    fn export(&self, request: &FieldRequest<'_>, _: &mut dyn RelationResolver) -> Result<ExportValue> {
        match request.value() {
            None | Some(Value::Null) => Ok(ExportValue::Null),
            Some(value) => Ok(ExportValue::Scalar(value.to_string())),
        }
    }
}

/// Date fields: RFC 3339, or an empty string when unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateHandler;

impl FieldHandler for DateHandler {
    fn export(&self, request: &FieldRequest<'_>, _: &mut dyn RelationResolver) -> Result<ExportValue> {
        let text = match request.value() {
            Some(Value::Date(date)) => date.to_rfc3339(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Ok(ExportValue::Scalar(text))
    }
}

/// Object relations: referenced objects grouped by class.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationHandler;

impl FieldHandler for RelationHandler {
    fn export(&self, request: &FieldRequest<'_>, resolver: &mut dyn RelationResolver) -> Result<ExportValue> {
        let targets: Vec<ObjectId> = match request.value() {
            Some(Value::Relations(ids)) => ids.clone(),
            Some(Value::MetadataRelations(relations)) => relations.iter().map(|r| r.target).collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                resolver.report(request.not_iterable());
                Vec::new()
            }
        };

        let mut groups = ClassGroups::new();
        for target in targets {
            match resolver.export_reference(target)? {
                Some(node) => groups.push(node),
                None => resolver.report(request.missing_target(target)),
            }
        }

        Ok(ExportValue::Relations(groups))
    }
}

/// Relations carrying metadata: one `pc:relation` entry per reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataRelationHandler;

impl FieldHandler for MetadataRelationHandler {
    fn export(&self, request: &FieldRequest<'_>, resolver: &mut dyn RelationResolver) -> Result<ExportValue> {
        let relations: Vec<MetadataRelation> = match request.value() {
            Some(Value::MetadataRelations(relations)) => relations.clone(),
            Some(Value::Relations(ids)) => ids.iter().map(|&id| MetadataRelation::new(id)).collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                resolver.report(request.not_iterable());
                Vec::new()
            }
        };

        let mut entries = Vec::with_capacity(relations.len());
        for relation in relations {
            match resolver.export_reference(relation.target)? {
                Some(node) => entries.push(RelationEntry {
                    node,
                    metadata: relation.metadata,
                }),
                None => resolver.report(request.missing_target(relation.target)),
            }
        }

        Ok(ExportValue::MetadataRelations(entries))
    }
}
