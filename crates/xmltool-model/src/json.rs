//! JSON snapshot loading for [`MemoryStore`].
//!
//! A snapshot lists languages, classes and objects. Object order in the file
//! is sibling order. Raw JSON values are converted according to the type tag
//! of the field they belong to, so dates and relations need no extra markup.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::schema::tags;
use crate::{
    ClassDefinition, Error, FieldDefinition, MemoryStore, MetadataRelation, ObjectId, ObjectKind, Result,
    StoreBuilder, Value,
};

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    classes: Vec<ClassDoc>,
    #[serde(default)]
    objects: Vec<ObjectDoc>,
}

#[derive(Debug, Deserialize)]
struct ClassDoc {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDoc>,
}

#[derive(Debug, Deserialize)]
struct FieldDoc {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    children: Vec<FieldDoc>,
}

#[derive(Debug, Deserialize)]
struct ObjectDoc {
    id: ObjectId,
    #[serde(default)]
    parent: Option<ObjectId>,
    kind: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    values: serde_json::Map<String, Json>,
}

impl From<FieldDoc> for FieldDefinition {
    fn from(doc: FieldDoc) -> Self {
        FieldDefinition {
            name: doc.name,
            field_type: doc.field_type,
            children: doc.children.into_iter().map(Into::into).collect(),
        }
    }
}

impl MemoryStore {
    /// Load a store from a JSON snapshot string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.into_store()
    }

    /// Load a store from a JSON snapshot file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Snapshot {
    fn into_store(self) -> Result<MemoryStore> {
        let mut builder = StoreBuilder::new();
        for language in self.languages {
            builder.language(language);
        }

        let classes: Vec<ClassDefinition> = self
            .classes
            .into_iter()
            .map(|c| ClassDefinition {
                name: c.name,
                fields: c.fields.into_iter().map(Into::into).collect(),
            })
            .collect();

        // Variants may omit their class; remember declared classes to resolve them
        let declared: rustc_hash::FxHashMap<ObjectId, (Option<ObjectId>, Option<String>)> = self
            .objects
            .iter()
            .map(|o| (o.id, (o.parent, o.class.clone())))
            .collect();

        for object in self.objects {
            let kind: ObjectKind = object.kind.parse()?;
            builder.insert(object.id, object.parent, kind, object.key, object.class.clone());

            if object.values.is_empty() {
                continue;
            }

            let class_name = effective_class(&declared, object.id).ok_or(Error::MissingClass(object.id))?;
            let class = classes.iter().find(|c| c.name == class_name).ok_or_else(|| Error::UnknownClass {
                id: object.id,
                class: class_name.clone(),
            })?;

            for (field, raw) in object.values {
                set_field(&mut builder, class, object.id, &field, raw)?;
            }
        }

        for class in classes {
            builder.add_class(class);
        }

        builder.build()
    }
}

fn effective_class(
    declared: &rustc_hash::FxHashMap<ObjectId, (Option<ObjectId>, Option<String>)>,
    id: ObjectId,
) -> Option<String> {
    let mut current = id;
    for _ in 0..declared.len() {
        let (parent, class) = declared.get(&current)?;
        if let Some(class) = class {
            return Some(class.clone());
        }
        current = (*parent)?;
    }
    None
}

fn set_field(builder: &mut StoreBuilder, class: &ClassDefinition, id: ObjectId, field: &str, raw: Json) -> Result<()> {
    // A localized container holds { field: { language: value } }
    if let Some(container) = class.fields.iter().find(|f| f.name == field && f.is_localized()) {
        let Json::Object(inner) = raw else {
            return Err(invalid(id, field, "localized container must be an object"));
        };
        for (name, per_language) in inner {
            let (definition, _) = FieldDefinition::find(&container.children, &name)
                .ok_or_else(|| invalid(id, &name, "not defined in localized container"))?;
            let Json::Object(languages) = per_language else {
                return Err(invalid(id, &name, "localized value must map languages to values"));
            };
            for (language, value) in languages {
                let value = convert(&definition.field_type, id, &name, value)?;
                builder.set_localized(id, name.clone(), language, value);
            }
        }
        return Ok(());
    }

    let (definition, _) = class
        .find_field(field)
        .ok_or_else(|| invalid(id, field, "not defined in class"))?;
    let value = convert(&definition.field_type, id, field, raw)?;
    builder.set(id, field, value);
    Ok(())
}

/// Convert a raw JSON value according to the declared field type.
fn convert(field_type: &str, id: ObjectId, field: &str, raw: Json) -> Result<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    match field_type {
        t if tags::is_date(t) => {
            let text = raw.as_str().ok_or_else(|| invalid(id, field, "date must be a string"))?;
            parse_date(text)
                .map(Value::Date)
                .ok_or_else(|| invalid(id, field, &format!("unparseable date '{}'", text)))
        }
        t if tags::is_relation(t) => {
            let items = raw.as_array().ok_or_else(|| invalid(id, field, "relation must be an array of ids"))?;
            items
                .iter()
                .map(|item| item.as_u64().ok_or_else(|| invalid(id, field, "relation id must be an integer")))
                .collect::<Result<Vec<_>>>()
                .map(Value::Relations)
        }
        t if tags::is_metadata_relation(t) => {
            let items = raw.as_array().ok_or_else(|| invalid(id, field, "relation must be an array"))?;
            items
                .iter()
                .map(|item| convert_metadata_relation(id, field, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::MetadataRelations)
        }
        _ => Ok(convert_scalar(raw)),
    }
}

fn convert_metadata_relation(id: ObjectId, field: &str, item: &Json) -> Result<MetadataRelation> {
    let target = item
        .get("id")
        .and_then(Json::as_u64)
        .ok_or_else(|| invalid(id, field, "relation entry needs an integer 'id'"))?;

    let mut relation = MetadataRelation::new(target);
    if let Some(Json::Object(meta)) = item.get("meta") {
        for (name, value) in meta {
            let text = match value {
                Json::String(s) => s.clone(),
                Json::Null => String::new(),
                other => other.to_string(),
            };
            relation = relation.with(name.clone(), text);
        }
    }
    Ok(relation)
}

fn convert_scalar(raw: Json) -> Value {
    match raw {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        Json::String(s) => Value::Text(s),
        other => Value::Text(other.to_string()),
    }
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (taken as UTC midnight).
pub fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date);
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    let utc = FixedOffset::east_opt(0)?;
    date.and_hms_opt(0, 0, 0)?.and_local_timezone(utc).single()
}

fn invalid(id: ObjectId, field: &str, reason: &str) -> Error {
    Error::InvalidValue {
        id,
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
