//! Tree exporter.

use log::{debug, info, warn};
use xmltool_model::{FieldDefinition, ObjectId, ObjectKind, ObjectStore, SourceObject};
use xmltool_xml::Document;

use crate::assemble::assemble;
use crate::cache::RelationCache;
use crate::dispatch::{FieldRegistry, FieldRequest, RelationResolver};
use crate::node::{FOLDER_CLASS, PC_NAMESPACE, PC_NAMESPACE_ATTRIBUTE};
use crate::postprocess::{PostProcessor, XsltProcessor};
use crate::{ClassGroups, Diagnostic, Error, ExportNode, ExportOptions, ExportValue, NodeAttributes, Result};

/// Result of a tree export.
#[derive(Debug, Clone)]
pub struct Export {
    /// The assembled (and post-processed) document.
    pub document: Document,
    /// Non-fatal problems, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

impl Export {
    /// Serialize the document.
    pub fn to_xml_string(&self, pretty: bool) -> Result<String> {
        Ok(self.document.to_xml_string(pretty)?)
    }
}

/// Result of exporting a single node without assembly.
#[derive(Debug, Clone)]
pub struct NodeExport {
    pub node: ExportNode,
    pub diagnostics: Vec<Diagnostic>,
}

/// Exports object trees to XML.
///
/// An exporter only holds the handler registry and the post-processor; all
/// per-call state lives in an [`ExportContext`], so one exporter can serve
/// concurrent exports.
pub struct Exporter {
    registry: FieldRegistry,
    post_processor: Box<dyn PostProcessor>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::with_registry(FieldRegistry::default())
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter").field("registry", &self.registry).finish_non_exhaustive()
    }
}

impl Exporter {
    /// Exporter with the built-in handlers and `xsltproc` post-processing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter with a custom handler registry.
    pub fn with_registry(registry: FieldRegistry) -> Self {
        Self {
            registry,
            post_processor: Box::new(XsltProcessor::default()),
        }
    }

    /// Replace the post-processor.
    pub fn with_post_processor(mut self, post_processor: impl PostProcessor + 'static) -> Self {
        self.post_processor = Box::new(post_processor);
        self
    }

    /// The handler registry.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Mutable access to the handler registry.
    pub fn registry_mut(&mut self) -> &mut FieldRegistry {
        &mut self.registry
    }

    /// Export one object and everything below it, without assembling.
    pub fn export_node(
        &self,
        store: &dyn ObjectStore,
        object: &SourceObject,
        options: &ExportOptions,
    ) -> Result<NodeExport> {
        let mut context = ExportContext::new(store, &self.registry, options);
        let node = context.export_node(object, true, true)?;
        Ok(NodeExport {
            node,
            diagnostics: context.into_diagnostics(),
        })
    }

    /// Export the tree rooted at `root` into a document.
    pub fn export_tree(&self, store: &dyn ObjectStore, root: &SourceObject, options: &ExportOptions) -> Result<Export> {
        info!("Exporting tree at object {} ('{}')", root.id, root.key);

        let NodeExport { mut node, diagnostics } = self.export_node(store, root, options)?;
        node.attributes
            .extra
            .push((PC_NAMESPACE_ATTRIBUTE.to_string(), PC_NAMESPACE.to_string()));

        let mut document = assemble(&node, &options.root_element_name);

        if let Some(stylesheet) = &options.post_process {
            info!("Post-processing with {}", stylesheet.display());
            document = self.post_processor.transform(&document, stylesheet)?;
        }

        info!(
            "Exported {} levels with {} diagnostic(s)",
            node.depth(),
            diagnostics.len()
        );

        Ok(Export { document, diagnostics })
    }

    /// Export the tree at a store path (`/` is the store root).
    pub fn export_path(&self, store: &dyn ObjectStore, path: &str, options: &ExportOptions) -> Result<Export> {
        let root = store
            .object_by_path(path)
            .ok_or_else(|| Error::ObjectNotFound(path.to_string()))?;
        self.export_tree(store, root, options)
    }

    /// Export the tree rooted at an object id.
    pub fn export_id(&self, store: &dyn ObjectStore, id: ObjectId, options: &ExportOptions) -> Result<Export> {
        let root = store
            .object(id)
            .ok_or_else(|| Error::ObjectNotFound(format!("id {}", id)))?;
        self.export_tree(store, root, options)
    }
}

/// How the exporter arrived at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    /// Tree root, child or variant of a tree node: always expanded.
    Tree,
    /// First visit through a relation: no children, variants as relations.
    Relation,
    /// Repeat visit through a relation: attributes only.
    Identity,
}

/// State of one export call.
pub struct ExportContext<'a> {
    store: &'a dyn ObjectStore,
    registry: &'a FieldRegistry,
    options: &'a ExportOptions,
    cache: RelationCache,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ExportContext<'a> {
    /// Create a context with an empty relation cache.
    pub fn new(store: &'a dyn ObjectStore, registry: &'a FieldRegistry, options: &'a ExportOptions) -> Self {
        Self {
            store,
            registry,
            options,
            cache: RelationCache::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Relation cache of this call.
    pub fn cache(&self) -> &RelationCache {
        &self.cache
    }

    /// Diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the context and return its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Export one object.
    ///
    /// With `use_recursion` the object's children are exported recursively.
    /// With `include_fields` the fields of its class are serialized. Variants
    /// are expanded whenever the options ask for them.
    pub fn export_node(
        &mut self,
        object: &'a SourceObject,
        use_recursion: bool,
        include_fields: bool,
    ) -> Result<ExportNode> {
        self.export_object(object, use_recursion, include_fields, Reach::Tree)
    }

    /// Export an object reached through a relation.
    ///
    /// An object already in the cache is written with its identity
    /// attributes only, without fields or variants.
    fn export_related(&mut self, object: &'a SourceObject) -> Result<ExportNode> {
        if self.cache.contains(object.id) {
            return self.export_object(object, false, false, Reach::Identity);
        }
        let include_fields = !self.options.omit_relation_object_fields;
        self.export_object(object, false, include_fields, Reach::Relation)
    }

    fn export_object(
        &mut self,
        object: &'a SourceObject,
        use_recursion: bool,
        include_fields: bool,
        reach: Reach,
    ) -> Result<ExportNode> {
        let store = self.store;
        self.cache.mark(object.id);

        debug!(
            "Exporting object {} ('{}', recursion={}, fields={}, {:?})",
            object.id, object.key, use_recursion, include_fields, reach
        );

        let (class_name, fields) = if object.kind.is_folder() {
            (FOLDER_CLASS.to_string(), Vec::new())
        } else {
            let name = object.class_name.as_deref().unwrap_or_default();
            let class = store.class(name).ok_or_else(|| Error::ClassNotFound {
                object: object.id,
                class: name.to_string(),
            })?;

            let mut fields = Vec::new();
            if include_fields {
                self.process_fields(object, &class.fields, None, &mut fields)?;
            }
            (class.name.clone(), fields)
        };

        let mut children = ClassGroups::new();
        if use_recursion {
            for child in store.children(object) {
                children.push(self.export_node(child, true, true)?);
            }
        }

        let mut variants = ClassGroups::new();
        if self.options.include_variants && reach != Reach::Identity {
            for variant in store.variants(object) {
                let node = match reach {
                    Reach::Relation => self.export_related(variant)?,
                    _ => self.export_object(variant, true, true, Reach::Tree)?,
                };
                variants.push(node);
            }
        }

        let attributes = NodeAttributes {
            id: object.id,
            kind: object.kind,
            key: object.key.clone(),
            class: class_name,
            is_variant_leaf: object.kind == ObjectKind::Variant && variants.is_empty(),
            is_object_leaf: object.kind == ObjectKind::Object && children.is_empty(),
            extra: Vec::new(),
        };

        Ok(ExportNode {
            attributes,
            fields,
            children,
            variants,
        })
    }

    /// Serialize field definitions in schema order.
    ///
    /// Localized containers recurse once per store language, passing the
    /// language down explicitly.
    fn process_fields(
        &mut self,
        object: &'a SourceObject,
        definitions: &'a [FieldDefinition],
        language: Option<&'a str>,
        out: &mut Vec<(String, ExportValue)>,
    ) -> Result<()> {
        let store = self.store;
        let registry = self.registry;

        for field in definitions {
            if registry.is_localized(&field.field_type) {
                let mut languages = Vec::with_capacity(store.languages().len());
                for code in store.languages() {
                    let mut values = Vec::with_capacity(field.children.len());
                    self.process_fields(object, &field.children, Some(code.as_str()), &mut values)?;
                    languages.push((code.clone(), values));
                }
                out.push((field.name.clone(), ExportValue::Localized(languages)));
                continue;
            }

            let request = FieldRequest {
                object,
                field,
                language,
            };
            let value = registry.dispatch(&request, self)?;
            out.push((field.name.clone(), value));
        }

        Ok(())
    }
}

impl<'a> RelationResolver for ExportContext<'a> {
    fn export_reference(&mut self, id: ObjectId) -> Result<Option<ExportNode>> {
        let store = self.store;
        let Some(object) = store.object(id) else {
            return Ok(None);
        };

        self.export_related(object).map(Some)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}
