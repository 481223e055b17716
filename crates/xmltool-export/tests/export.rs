//! End-to-end exports against in-memory stores.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::DateTime;
use xmltool_export::{Diagnostic, Error, ExportOptions, Exporter};
use xmltool_model::{ClassDefinition, FieldDefinition, MemoryStore, MetadataRelation, StoreBuilder, Value};
use xmltool_xml::{Document, Element};

const DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

fn article_class() -> ClassDefinition {
    ClassDefinition::new("Article")
        .field(FieldDefinition::new("title", "input"))
        .field(FieldDefinition::new("publishDate", "date"))
}

fn related_class(name: &str) -> ClassDefinition {
    ClassDefinition::new(name)
        .field(FieldDefinition::new("title", "input"))
        .field(FieldDefinition::new("related", "many-to-many-relation"))
}

fn raw(store: &MemoryStore, path: &str, options: &ExportOptions) -> String {
    Exporter::new()
        .export_path(store, path, options)
        .unwrap()
        .to_xml_string(false)
        .unwrap()
}

#[test]
fn single_article_raw_output() {
    let mut builder = StoreBuilder::new();
    builder.add_class(article_class());
    let root = builder.add_root();
    let hello = builder.add_object(root, "hello", "Article");
    builder.set(hello, "title", Value::from("Hello"));
    builder.set(
        hello,
        "publishDate",
        Value::Date(DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap()),
    );
    let store = builder.build().unwrap();

    let xml = raw(&store, "/hello", &ExportOptions::default());
    let expected = format!(
        "{}<root id=\"{}\" type=\"object\" key=\"hello\" class=\"Article\" is-variant-leaf=\"false\" \
         is-object-leaf=\"true\" xmlns:pc=\"https://basilicom.de/pimcore\"><title>Hello</title>\
         <publishDate>2024-01-01T00:00:00+00:00</publishDate></root>",
        DECL, hello
    );
    assert_eq!(xml, expected);
}

#[test]
fn unset_fields_render_empty() {
    let mut builder = StoreBuilder::new();
    builder.add_class(article_class());
    let root = builder.add_root();
    builder.add_object(root, "blank", "Article");
    let store = builder.build().unwrap();

    let xml = raw(&store, "/blank", &ExportOptions::default().root_element_name("item"));
    assert!(xml.ends_with("<title/><publishDate/></item>"), "{}", xml);
}

#[test]
fn children_grouped_by_class_in_first_seen_order() {
    let mut builder = StoreBuilder::new();
    builder.add_class(article_class());
    builder.add_class(ClassDefinition::new("News"));
    let root = builder.add_root();
    builder.add_object(root, "a1", "Article");
    builder.add_object(root, "n1", "News");
    builder.add_object(root, "a2", "Article");
    builder.add_folder(root, "archive");
    let store = builder.build().unwrap();

    let export = Exporter::new()
        .export_path(&store, "/", &ExportOptions::default())
        .unwrap();
    let root = export.document.root();
    assert_eq!(root.attribute("type"), Some("folder"));
    assert_eq!(root.attribute("class"), Some("Folder"));
    assert_eq!(root.attribute("is-object-leaf"), Some("false"));

    // One shared container; groups are Article, News, Folder
    assert_eq!(root.find_all("pc:children").count(), 1);
    let children = root.find("pc:children").unwrap();
    let seen: Vec<_> = children
        .children
        .iter()
        .map(|c| (c.name.as_str(), c.attribute("key").unwrap()))
        .collect();
    assert_eq!(
        seen,
        [("Article", "a1"), ("Article", "a2"), ("News", "n1"), ("Folder", "archive")]
    );

    let archive = children.find("Folder").unwrap();
    assert_eq!(archive.attribute("is-variant-leaf"), Some("false"));
    assert_eq!(archive.attribute("is-object-leaf"), Some("false"));
}

#[test]
fn variants_only_when_requested() {
    let mut builder = StoreBuilder::new();
    builder.add_class(article_class());
    let root = builder.add_root();
    let shirt = builder.add_object(root, "shirt", "Article");
    builder.add_variant(shirt, "shirt-red");
    let store = builder.build().unwrap();

    let without = Exporter::new()
        .export_path(&store, "/shirt", &ExportOptions::default())
        .unwrap();
    assert!(without.document.root().find("pc:variants").is_none());

    let with = Exporter::new()
        .export_path(&store, "/shirt", &ExportOptions::default().include_variants(true))
        .unwrap();
    let variants = with.document.root().find("pc:variants").unwrap();
    let red = variants.find("Article").unwrap();
    assert_eq!(red.attribute("type"), Some("variant"));
    assert_eq!(red.attribute("key"), Some("shirt-red"));
    assert_eq!(red.attribute("is-variant-leaf"), Some("true"));
    assert_eq!(red.attribute("is-object-leaf"), Some("false"));
    assert!(red.find("title").is_some());
}

#[test]
fn relation_cycle_terminates() {
    let mut builder = StoreBuilder::new();
    builder.add_class(related_class("Page"));
    let root = builder.add_root();
    let a = builder.add_object(root, "a", "Page");
    let b = builder.add_object(root, "b", "Page");
    builder.set(a, "title", Value::from("A"));
    builder.set(a, "related", Value::Relations(vec![b]));
    builder.set(b, "title", Value::from("B"));
    builder.set(b, "related", Value::Relations(vec![a]));
    let store = builder.build().unwrap();

    let export = Exporter::new()
        .export_path(&store, "/", &ExportOptions::default())
        .unwrap();
    assert!(export.diagnostics.is_empty());

    let children = export.document.root().find("pc:children").unwrap();
    let pages: Vec<&Element> = children.find_all("Page").collect();
    assert_eq!(pages.len(), 2);

    // a expands b fully; b's link back to a is identity only
    let b_in_a = pages[0].find("related").unwrap().find("Page").unwrap();
    assert_eq!(b_in_a.attribute("key"), Some("b"));
    assert_eq!(b_in_a.find("title").unwrap().text, "B");
    let a_in_b = b_in_a.find("related").unwrap().find("Page").unwrap();
    assert_eq!(a_in_b.attribute("key"), Some("a"));
    assert!(a_in_b.children.is_empty());

    // b is a tree child and is always expanded, but its relation to a is not
    assert_eq!(pages[1].find("title").unwrap().text, "B");
    let a_in_tree_b = pages[1].find("related").unwrap().find("Page").unwrap();
    assert!(a_in_tree_b.children.is_empty());
}

#[test]
fn repeated_reference_expands_once() {
    let mut builder = StoreBuilder::new();
    builder.add_class(related_class("Page"));
    builder.add_class(article_class());
    let root = builder.add_root();
    let hub = builder.add_object(root, "hub", "Page");
    let target = builder.add_object(root, "target", "Article");
    builder.set(target, "title", Value::from("Target"));
    builder.set(hub, "related", Value::Relations(vec![target, target]));
    let store = builder.build().unwrap();

    let export = Exporter::new()
        .export_path(&store, "/hub", &ExportOptions::default())
        .unwrap();
    let related: Vec<&Element> = export
        .document
        .root()
        .find("related")
        .unwrap()
        .find_all("Article")
        .collect();
    assert_eq!(related.len(), 2);
    assert_eq!(related[0].find("title").unwrap().text, "Target");
    assert!(related[1].children.is_empty());
    assert_eq!(related[1].attribute("id"), related[0].attribute("id"));
}

#[test]
fn omit_relation_object_fields() {
    let mut builder = StoreBuilder::new();
    builder.add_class(related_class("Page"));
    let root = builder.add_root();
    let a = builder.add_object(root, "a", "Page");
    let b = builder.add_object(root, "b", "Page");
    builder.set(b, "title", Value::from("B"));
    builder.set(a, "related", Value::Relations(vec![b]));
    let store = builder.build().unwrap();

    let options = ExportOptions::default().omit_relation_object_fields(true);
    let export = Exporter::new().export_path(&store, "/a", &options).unwrap();
    let b = export.document.root().find("related").unwrap().find("Page").unwrap();
    assert_eq!(b.attribute("key"), Some("b"));
    assert!(b.children.is_empty());
}

#[test]
fn relation_targets_include_variants_when_requested() {
    let mut builder = StoreBuilder::new();
    builder.add_class(related_class("Page"));
    builder.add_class(article_class());
    let root = builder.add_root();
    let page = builder.add_object(root, "page", "Page");
    let shirt = builder.add_object(root, "shirt", "Article");
    builder.add_variant(shirt, "shirt-red");
    builder.set(page, "related", Value::Relations(vec![shirt]));
    let store = builder.build().unwrap();

    let options = ExportOptions::default().include_variants(true);
    let export = Exporter::new().export_path(&store, "/page", &options).unwrap();
    let shirt = export.document.root().find("related").unwrap().find("Article").unwrap();
    let variants = shirt.find("pc:variants").unwrap();
    assert_eq!(variants.find("Article").unwrap().attribute("key"), Some("shirt-red"));
    assert!(shirt.find("pc:children").is_none());
}

#[test]
fn variant_relating_to_its_parent_terminates() {
    let mut builder = StoreBuilder::new();
    builder.add_class(related_class("Product"));
    let root = builder.add_root();
    let shirt = builder.add_object(root, "shirt", "Product");
    let red = builder.add_variant(shirt, "red");
    builder.set(shirt, "title", Value::from("Shirt"));
    builder.set(red, "title", Value::from("Red"));
    builder.set(red, "related", Value::Relations(vec![shirt]));
    let store = builder.build().unwrap();

    let options = ExportOptions::default().include_variants(true);
    let export = Exporter::new().export_path(&store, "/shirt", &options).unwrap();
    assert!(export.diagnostics.is_empty());

    let red = export.document.root().find("pc:variants").unwrap().find("Product").unwrap();
    assert_eq!(red.find("title").unwrap().text, "Red");
    let back = red.find("related").unwrap().find("Product").unwrap();
    assert_eq!(back.attribute("key"), Some("shirt"));
    assert!(back.children.is_empty());

    // Reached through a relation first, the cycle closes the same way
    let mut builder = StoreBuilder::new();
    builder.add_class(related_class("Product"));
    let root = builder.add_root();
    let page = builder.add_object(root, "page", "Product");
    let shirt = builder.add_object(root, "shirt", "Product");
    let red = builder.add_variant(shirt, "red");
    builder.set(page, "related", Value::Relations(vec![shirt]));
    builder.set(red, "related", Value::Relations(vec![shirt]));
    let store = builder.build().unwrap();

    let export = Exporter::new().export_path(&store, "/page", &options).unwrap();
    let shirt = export.document.root().find("related").unwrap().find("Product").unwrap();
    let red = shirt.find("pc:variants").unwrap().find("Product").unwrap();
    let back = red.find("related").unwrap().find("Product").unwrap();
    assert_eq!(back.attribute("key"), Some("shirt"));
    assert!(back.children.is_empty());
}

#[test]
fn repeated_reference_does_not_expand_variants_again() {
    let mut builder = StoreBuilder::new();
    builder.add_class(related_class("Page"));
    builder.add_class(article_class());
    let root = builder.add_root();
    let hub = builder.add_object(root, "hub", "Page");
    let shirt = builder.add_object(root, "shirt", "Article");
    let red = builder.add_variant(shirt, "shirt-red");
    builder.set(red, "title", Value::from("Red"));
    builder.set(hub, "related", Value::Relations(vec![shirt, shirt]));
    let store = builder.build().unwrap();

    let options = ExportOptions::default().include_variants(true);
    let export = Exporter::new().export_path(&store, "/hub", &options).unwrap();
    let shirts: Vec<&Element> = export
        .document
        .root()
        .find("related")
        .unwrap()
        .find_all("Article")
        .collect();
    assert_eq!(shirts.len(), 2);

    let red = shirts[0].find("pc:variants").unwrap().find("Article").unwrap();
    assert_eq!(red.find("title").unwrap().text, "Red");
    assert!(shirts[1].children.is_empty());
    assert_eq!(shirts[1].attribute("id"), shirts[0].attribute("id"));
}

#[test]
fn unsupported_field_type_is_skipped() {
    let mut builder = StoreBuilder::new();
    builder.add_class(
        ClassDefinition::new("Store")
            .field(FieldDefinition::new("name", "input"))
            .field(FieldDefinition::new("location", "geopoint")),
    );
    let root = builder.add_root();
    let shop = builder.add_object(root, "shop", "Store");
    builder.set(shop, "name", Value::from("Main"));
    let store = builder.build().unwrap();

    let export = Exporter::new()
        .export_path(&store, "/shop", &ExportOptions::default())
        .unwrap();
    let xml = export.to_xml_string(false).unwrap();
    assert!(xml.contains("<name>Main</name><location skipped=\"true\" fieldtype=\"geopoint\"/>"));
    assert_eq!(
        export.diagnostics,
        vec![Diagnostic::UnsupportedFieldType {
            object: shop,
            field: "location".into(),
            field_type: "geopoint".into(),
        }]
    );
}

#[test]
fn localized_fields_per_language() {
    let mut builder = StoreBuilder::new();
    builder.language("en").language("de");
    builder.add_class(ClassDefinition::new("Article").field(FieldDefinition::localized(
        "localizedfields",
        [FieldDefinition::new("teaser", "textarea")],
    )));
    let root = builder.add_root();
    let hello = builder.add_object(root, "hello", "Article");
    builder.set_localized(hello, "teaser", "en", Value::from("Hi"));
    let store = builder.build().unwrap();

    let xml = raw(&store, "/hello", &ExportOptions::default());
    assert!(xml.contains(
        "<localizedfields><en><teaser language=\"en\">Hi</teaser></en>\
         <de><teaser language=\"de\"/></de></localizedfields>"
    ));
}

#[test]
fn metadata_relations() {
    let mut builder = StoreBuilder::new();
    builder.add_class(
        ClassDefinition::new("Article").field(FieldDefinition::new("authors", "advancedManyToManyObjectRelation")),
    );
    builder.add_class(ClassDefinition::new("Person"));
    let root = builder.add_root();
    let hello = builder.add_object(root, "hello", "Article");
    let jo = builder.add_object(root, "jo", "Person");
    builder.set(
        hello,
        "authors",
        Value::MetadataRelations(vec![
            MetadataRelation::new(jo).with("role", "editor"),
            MetadataRelation::new(404),
        ]),
    );
    let store = builder.build().unwrap();

    let export = Exporter::new()
        .export_path(&store, "/hello", &ExportOptions::default())
        .unwrap();
    let xml = export.to_xml_string(false).unwrap();
    let expected = format!(
        "<authors><pc:relation><Person id=\"{}\" type=\"object\" key=\"jo\" class=\"Person\" \
         is-variant-leaf=\"false\" is-object-leaf=\"true\"/><pc:meta><role>editor</role></pc:meta>\
         </pc:relation></authors>",
        jo
    );
    assert!(xml.contains(&expected), "{}", xml);
    assert_eq!(
        export.diagnostics,
        vec![Diagnostic::MissingRelationTarget {
            object: hello,
            field: "authors".into(),
            target: 404,
        }]
    );
}

#[test]
fn output_is_deterministic() {
    let json = r#"{
        "languages": ["en", "de"],
        "classes": [
            { "name": "Article", "fields": [
                { "name": "title", "type": "input" },
                { "name": "related", "type": "objects" },
                { "name": "localizedfields", "type": "localizedfields", "children": [
                    { "name": "teaser", "type": "wysiwyg" }
                ] }
            ] },
            { "name": "News", "fields": [ { "name": "title", "type": "input" } ] }
        ],
        "objects": [
            { "id": 1, "kind": "folder", "key": "" },
            { "id": 2, "parent": 1, "kind": "object", "key": "a", "class": "Article",
              "values": { "title": "A", "related": [4, 3],
                          "localizedfields": { "teaser": { "en": "x", "de": "y" } } } },
            { "id": 3, "parent": 1, "kind": "object", "key": "n", "class": "News", "values": { "title": "N" } },
            { "id": 4, "parent": 1, "kind": "object", "key": "b", "class": "Article" },
            { "id": 5, "parent": 4, "kind": "variant", "key": "b-1" }
        ]
    }"#;
    let store = MemoryStore::from_json(json).unwrap();
    let options = ExportOptions::default().include_variants(true);

    let exporter = Exporter::new();
    let first = exporter.export_path(&store, "/", &options).unwrap();
    let second = exporter.export_path(&store, "/", &options).unwrap();
    assert_eq!(
        first.to_xml_string(true).unwrap(),
        second.to_xml_string(true).unwrap()
    );
    assert_eq!(
        first.to_xml_string(false).unwrap(),
        second.to_xml_string(false).unwrap()
    );
}

#[test]
fn depth_matches_object_tree() {
    let mut builder = StoreBuilder::new();
    builder.add_class(article_class());
    let root = builder.add_root();
    let level1 = builder.add_folder(root, "l1");
    let level2 = builder.add_folder(level1, "l2");
    builder.add_object(level2, "leaf", "Article");
    let store = builder.build().unwrap();

    let exporter = Exporter::new();
    let export = exporter
        .export_node(&store, store.root().unwrap(), &ExportOptions::default())
        .unwrap();
    assert_eq!(export.node.depth(), 4);

    let document = exporter
        .export_path(&store, "/", &ExportOptions::default())
        .unwrap()
        .document;
    // root > pc:children > l1 > pc:children > l2 > pc:children > leaf > title
    assert_eq!(document.root().depth(), 8);
}

#[test]
fn missing_root_is_not_found() {
    let mut builder = StoreBuilder::new();
    builder.add_root();
    let store = builder.build().unwrap();

    let err = Exporter::new()
        .export_path(&store, "/nope", &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::ObjectNotFound(ref path) if path == "/nope"));
    assert_eq!(err.code(), 404);
    let message = err.to_document();
    assert_eq!(message.root().find("code").unwrap().text, "404");
}

fn folder_store() -> MemoryStore {
    let mut builder = StoreBuilder::new();
    builder.add_root();
    builder.build().unwrap()
}

#[test]
fn post_processor_runs_only_with_stylesheet() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let exporter = Exporter::new().with_post_processor(move |document: &Document, stylesheet: &Path| -> xmltool_export::Result<Document> {
        counter.fetch_add(1, Ordering::SeqCst);
        let wrapped = Element::new("transformed")
            .attr("stylesheet", stylesheet.display().to_string())
            .child(document.root().clone());
        Ok(Document::new(wrapped))
    });
    let store = folder_store();

    let plain = exporter.export_path(&store, "/", &ExportOptions::default()).unwrap();
    assert_eq!(plain.document.root().name, "root");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let options = ExportOptions::default().post_process("feed.xsl");
    let transformed = exporter.export_path(&store, "/", &options).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(transformed.document.root().name, "transformed");
    assert_eq!(transformed.document.root().attribute("stylesheet"), Some("feed.xsl"));
    assert!(transformed.document.root().find("root").is_some());
}

#[test]
fn post_processor_failure_aborts() {
    let exporter = Exporter::new()
        .with_post_processor(|_: &Document, _: &Path| -> xmltool_export::Result<Document> {
            Err(Error::PostProcess("engine exploded".into()))
        });
    let options = ExportOptions::default().post_process("feed.xsl");

    let err = exporter.export_path(&folder_store(), "/", &options).unwrap_err();
    assert!(matches!(err, Error::PostProcess(ref m) if m == "engine exploded"));
    assert_eq!(err.code(), 500);
}

#[test]
fn missing_stylesheet_aborts() {
    let options = ExportOptions::default().post_process("/nonexistent/feed.xsl");
    let err = Exporter::new()
        .export_path(&folder_store(), "/", &options)
        .unwrap_err();
    assert!(matches!(err, Error::PostProcess(_)));
}
