use crate::error::QmrfError;
use crate::report::QmrfReport;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// The six catalogs of a QMRF 1.3 document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Software,
    Algorithms,
    Descriptors,
    Endpoints,
    Publications,
    Authors,
}

impl Catalog {
    pub const ALL: [Catalog; 6] = [
        Catalog::Software,
        Catalog::Algorithms,
        Catalog::Descriptors,
        Catalog::Endpoints,
        Catalog::Publications,
        Catalog::Authors,
    ];

    /// Element name of the catalog container, e.g. `publications_catalog`.
    pub fn as_str(self) -> &'static str {
        match self {
            Catalog::Software => "software_catalog",
            Catalog::Algorithms => "algorithms_catalog",
            Catalog::Descriptors => "descriptors_catalog",
            Catalog::Endpoints => "endpoints_catalog",
            Catalog::Publications => "publications_catalog",
            Catalog::Authors => "authors_catalog",
        }
    }

    /// Element name of an entry: the catalog name without `_catalog` and
    /// without a plural `s` (`publications_catalog` -> `publication`).
    pub fn entry_element(self) -> &'static str {
        let name = self.as_str();
        let base = name.strip_suffix("_catalog").unwrap_or(name);
        base.strip_suffix('s').unwrap_or(base)
    }

    /// Element name of a reference to an entry (`publication_ref`).
    pub fn reference_element(self) -> String {
        format!("{}_ref", self.entry_element())
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Catalog {
    type Err = QmrfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Catalog::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| QmrfError::UnknownCatalog(s.to_string()))
    }
}

/// Whether `name` is one of the recognized catalog names.
pub fn catalog_exists(name: &str) -> bool {
    name.parse::<Catalog>().is_ok()
}

impl QmrfReport {
    /// Creates the entry `id` in `catalog`, or merges `attributes` into it
    /// when it already exists.
    ///
    /// Merging overwrites existing keys in place and appends new ones; keys
    /// not mentioned are kept. New entries are appended to the catalog, so
    /// serialization follows insertion order. Nothing is written when the
    /// call fails.
    pub fn upsert_entry<I, K, V>(
        &mut self,
        catalog: Catalog,
        id: &str,
        attributes: I,
    ) -> Result<(), QmrfError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let attributes: Vec<(K, V)> = attributes.into_iter().collect();
        if let Some((key, _)) = attributes
            .iter()
            .find(|(k, v)| k.as_ref() == "id" && v.as_ref() != id)
        {
            return Err(QmrfError::ReservedAttribute(key.as_ref().to_string()));
        }

        let key = (catalog, id.to_string());
        let node = match self.entries.get(&key).copied() {
            Some(node) => {
                log::debug!("Merging {} attributes into {catalog} entry '{id}'", attributes.len());
                node
            }
            None => {
                log::debug!("Adding {catalog} entry '{id}'");
                let parent = self.catalog_nodes[catalog.index()];
                let node = self
                    .doc
                    .append_element(parent, catalog.entry_element(), [("id", id)]);
                self.entries.insert(key, node);
                node
            }
        };

        for (k, v) in &attributes {
            self.doc.set_attribute(node, k.as_ref(), v.as_ref());
        }
        Ok(())
    }

    /// Looks up one attribute of a catalog entry. Returns `None` when the
    /// entry or the attribute does not exist.
    pub fn entry_attribute(&self, catalog: Catalog, id: &str, key: &str) -> Option<&str> {
        let node = *self.entries.get(&(catalog, id.to_string()))?;
        self.doc.attribute(node, key)
    }

    /// All attributes of a catalog entry, including its `id`.
    pub fn entry(&self, catalog: Catalog, id: &str) -> Option<&IndexMap<String, String>> {
        let node = *self.entries.get(&(catalog, id.to_string()))?;
        self.doc.attributes(node)
    }

    pub fn has_entry(&self, catalog: Catalog, id: &str) -> bool {
        self.entries.contains_key(&(catalog, id.to_string()))
    }

    /// Entries of `catalog` in document order.
    pub fn catalog_entries(&self, catalog: Catalog) -> Vec<&IndexMap<String, String>> {
        let node = self.catalog_nodes[catalog.index()];
        self.doc
            .child_elements(node)
            .filter_map(|entry| self.doc.attributes(entry))
            .collect()
    }

    /// Links the entry `id` of `catalog` into `chapter`.
    ///
    /// Returns `Ok(false)` without touching the document when the chapter
    /// already references `id`.
    pub fn add_reference(
        &mut self,
        chapter: &str,
        catalog: Catalog,
        id: &str,
    ) -> Result<bool, QmrfError> {
        if !self.has_entry(catalog, id) {
            return Err(QmrfError::DanglingReference {
                catalog,
                id: id.to_string(),
            });
        }
        let chapter_node = self.node(chapter)?;

        let linked = self.references.entry(chapter_node).or_default();
        if linked.contains(id) {
            log::debug!("Chapter '{chapter}' already references '{id}'");
            return Ok(false);
        }
        linked.insert(id.to_string());

        let element = catalog.reference_element();
        self.doc
            .append_element(chapter_node, &element, [("idref", id)]);
        log::debug!("Added <{element} idref=\"{id}\"/> to chapter '{chapter}'");
        Ok(true)
    }

    /// Idrefs referenced from `chapter`, in document order.
    pub fn references(&self, chapter: &str) -> Result<Vec<String>, QmrfError> {
        let chapter_node = self.node(chapter)?;
        Ok(self
            .doc
            .child_elements(chapter_node)
            .filter_map(|r| self.doc.attribute(r, "idref"))
            .map(str::to_string)
            .collect())
    }
}
