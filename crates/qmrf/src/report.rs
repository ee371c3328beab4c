use crate::catalog::Catalog;
use crate::error::QmrfError;
use crate::{SCHEMA, TEMPLATE};
use qsar_xml::{NodeId, XmlDocument};
use qsar_xsd::Schema;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// One QMRF document and the indexes that keep catalog and reference
/// edits idempotent.
///
/// Every instance owns its own tree; nothing is shared between reports.
#[derive(Debug, Clone)]
pub struct QmrfReport {
    pub(crate) doc: XmlDocument,
    pub(crate) schema: Schema,
    /// Catalog container nodes, indexed by [`Catalog::index`].
    pub(crate) catalog_nodes: Vec<NodeId>,
    pub(crate) entries: HashMap<(Catalog, String), NodeId>,
    /// Idrefs already linked from each chapter node.
    pub(crate) references: HashMap<NodeId, HashSet<String>>,
}

impl QmrfReport {
    /// Creates a report from the embedded QMRF template and schema.
    pub fn new() -> Result<Self, QmrfError> {
        Self::from_sources(TEMPLATE, SCHEMA)
    }

    /// Creates a report from template and schema text.
    ///
    /// The template may be any QMRF document, including a filled-in one:
    /// entries and references already present are indexed.
    pub fn from_sources(template: &str, schema: &str) -> Result<Self, QmrfError> {
        let doc = XmlDocument::parse(template)?;
        let schema = Schema::compile(schema)?;
        Self::from_parts(doc, schema)
    }

    /// Parses an existing QMRF document, validated against the embedded schema.
    pub fn from_xml(xml: &str) -> Result<Self, QmrfError> {
        Self::from_sources(xml, SCHEMA)
    }

    /// Opens an existing QMRF document from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QmrfError> {
        let path = path.as_ref();
        log::info!("Opening QMRF report from {}", path.display());
        let xml = fs::read_to_string(path)?;
        Self::from_xml(&xml)
    }

    fn from_parts(doc: XmlDocument, schema: Schema) -> Result<Self, QmrfError> {
        let mut catalog_nodes = Vec::with_capacity(Catalog::ALL.len());
        let mut entries = HashMap::new();
        for catalog in Catalog::ALL {
            let node = doc
                .find_element(catalog.as_str())
                .ok_or(QmrfError::MissingCatalog(catalog))?;
            for entry in doc.child_elements(node) {
                if let Some(id) = doc.attribute(entry, "id") {
                    entries.insert((catalog, id.to_string()), entry);
                }
            }
            catalog_nodes.push(node);
        }

        let reference_names: Vec<String> =
            Catalog::ALL.iter().map(|c| c.reference_element()).collect();
        let mut references: HashMap<NodeId, HashSet<String>> = HashMap::new();
        for node in doc.descendants(doc.root()) {
            let is_reference = doc
                .name(node)
                .is_some_and(|n| reference_names.iter().any(|r| r == n));
            if let (true, Some(parent), Some(idref)) =
                (is_reference, doc.parent(node), doc.attribute(node, "idref"))
            {
                references
                    .entry(parent)
                    .or_default()
                    .insert(idref.to_string());
            }
        }

        log::debug!(
            "Indexed {} catalog entries and {} referencing chapters",
            entries.len(),
            references.len()
        );
        Ok(Self {
            doc,
            schema,
            catalog_nodes,
            entries,
            references,
        })
    }

    /// Read access to the whole document tree, for rendering.
    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    /// Serializes the report as QMRF XML.
    pub fn to_xml(&self) -> Result<String, QmrfError> {
        Ok(self.doc.to_xml()?)
    }

    /// Writes the QMRF XML to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), QmrfError> {
        let path = path.as_ref();
        fs::write(path, self.to_xml()?)?;
        log::info!("Saved QMRF report to {}", path.display());
        Ok(())
    }

    /// Resolves a node by element name, first match in document order.
    pub(crate) fn node(&self, name: &str) -> Result<NodeId, QmrfError> {
        self.doc
            .find_element(name)
            .ok_or_else(|| QmrfError::UnknownField(name.to_string()))
    }
}
