use crate::error::XmlError;
use indexmap::IndexMap;

/// Index of a node inside an [`XmlDocument`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// An element's name and its attributes, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An owned, editable markup tree.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Detached nodes
/// stay in the arena but are unreachable from the root, so they never show
/// up in traversal or serialization.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
    /// Markup before the document element, in source order.
    pub(crate) prolog: Vec<Misc>,
    /// Comments and processing instructions after the document element.
    pub(crate) epilog: Vec<Misc>,
}

/// Top-level markup outside the document element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Misc {
    /// Everything between `<!DOCTYPE ` and the closing `>`.
    Doctype(String),
    Comment(String),
    /// Target and data of a processing instruction, as written.
    Instruction(String),
}

impl XmlDocument {
    /// Parses markup text into an owned tree.
    ///
    /// Element, text, and comment nodes are kept; processing instructions
    /// and the document type declaration are dropped. Names are stored
    /// without namespace prefixes.
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let source = roxmltree::Document::parse_with_options(text, options)?;
        let root_element = source.root_element();
        let root_range = root_element.range();

        let mut prolog: Vec<(usize, Misc)> = Vec::new();
        let mut epilog = Vec::new();
        for node in source.root().children() {
            let misc = if let Some(pi) = node.pi() {
                Misc::Instruction(match pi.value {
                    Some(value) => format!("{} {}", pi.target, value),
                    None => pi.target.to_string(),
                })
            } else if node.is_comment() {
                Misc::Comment(node.text().unwrap_or_default().to_string())
            } else {
                continue;
            };
            if node.range().start < root_range.start {
                prolog.push((node.range().start, misc));
            } else {
                epilog.push(misc);
            }
        }
        if let Some((offset, doctype)) = find_doctype(&text[..root_range.start]) {
            prolog.push((offset, Misc::Doctype(doctype.to_string())));
        }
        prolog.sort_by_key(|(offset, _)| *offset);

        let mut doc = XmlDocument {
            nodes: Vec::new(),
            root: NodeId(0),
            prolog: prolog.into_iter().map(|(_, misc)| misc).collect(),
            epilog,
        };
        doc.root = doc.import(root_element, None);
        log::debug!("Parsed markup tree with {} nodes", doc.nodes.len());
        Ok(doc)
    }

    /// The document type declaration without `<!DOCTYPE ` and `>`, if the
    /// source had one.
    pub fn doctype(&self) -> Option<&str> {
        self.prolog.iter().find_map(|misc| match misc {
            Misc::Doctype(text) => Some(text.as_str()),
            _ => None,
        })
    }

    fn import(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> NodeId {
        let kind = if node.is_element() {
            let attributes = node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect();
            NodeKind::Element(Element {
                name: node.tag_name().name().to_string(),
                attributes,
            })
        } else if node.is_comment() {
            NodeKind::Comment(node.text().unwrap_or_default().to_string())
        } else {
            NodeKind::Text(node.text().unwrap_or_default().to_string())
        };

        let id = self.push(kind, parent);
        for child in node.children() {
            if child.is_element() || child.is_text() || child.is_comment() {
                let child_id = self.import(child, Some(id));
                self.nodes[id.0].children.push(child_id);
            }
        }
        id
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Element name, or `None` for text and comment nodes.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child nodes of `id` that are elements, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.element(*c).is_some())
    }

    /// Pre-order traversal starting at (and including) `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// First element named `name` in document order.
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.find_descendant(self.root, name)
    }

    /// First element named `name` at or below `scope`, in document order.
    pub fn find_descendant(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(scope)
            .find(|id| self.name(*id) == Some(name))
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.attributes.get(key))
            .map(String::as_str)
    }

    pub fn attributes(&self, id: NodeId) -> Option<&IndexMap<String, String>> {
        self.element(id).map(|e| &e.attributes)
    }

    /// Sets an attribute on an element. An existing attribute keeps its
    /// position; a new one is appended after the others.
    ///
    /// Returns `false` when `id` is not an element.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: &str) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.attributes.insert(key.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    /// Concatenated text of all text nodes below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| match self.kind(n) {
                NodeKind::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replaces every child of `id` with a single text node.
    ///
    /// An empty `text` leaves the node without children.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let old = std::mem::take(&mut self.nodes[id.0].children);
        for child in old {
            self.nodes[child.0].parent = None;
        }
        if !text.is_empty() {
            let text_id = self.push(NodeKind::Text(text.to_string()), Some(id));
            self.nodes[id.0].children.push(text_id);
        }
    }

    /// Appends a new element as the last child of `parent`.
    pub fn append_element<I, K, V>(&mut self, parent: NodeId, name: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let element = Element {
            name: name.to_string(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        let id = self.push(NodeKind::Element(element), Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }
}

/// Locates `<!DOCTYPE ...>` in the text before the document element and
/// returns its offset and body. Brackets of an internal subset and quoted
/// literals may contain `>`.
fn find_doctype(prolog: &str) -> Option<(usize, &str)> {
    const OPEN: &str = "<!DOCTYPE";
    let start = prolog.find(OPEN)?;
    let body_start = start + OPEN.len();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in prolog[body_start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '>') if depth == 0 => {
                let body = &prolog[body_start..body_start + i];
                return Some((start, body.trim()));
            }
            _ => {}
        }
    }
    None
}

/// Iterator returned by [`XmlDocument::descendants`].
pub struct Descendants<'a> {
    doc: &'a XmlDocument,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
