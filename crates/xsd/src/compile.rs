use crate::error::SchemaError;
use crate::model::{
    AttributeDecl, Builtin, ComplexType, Content, ElementDecl, ElementRef, ElementType, GroupKind,
    Occurs, Particle, Schema, SimpleType, Term,
};
use roxmltree::Node;
use std::collections::HashMap;

const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

impl Schema {
    /// Compiles a schema document.
    pub fn compile(source: &str) -> Result<Self, SchemaError> {
        let doc = roxmltree::Document::parse(source)?;
        let root = doc.root_element();
        if root.tag_name().namespace() != Some(XSD_NS) || root.tag_name().name() != "schema" {
            return Err(SchemaError::NotASchema(root.tag_name().name().to_string()));
        }

        // Simple types first: complex types and elements refer to them by name.
        let mut compiler = Compiler::default();
        for child in xsd_children(root).filter(|c| c.tag_name().name() == "simpleType") {
            let name = required_attribute(child, "name")?;
            let ty = compiler.simple_type(child)?;
            compiler.simple_types.insert(name.to_string(), ty);
        }

        let mut schema = Schema::default();
        for child in xsd_children(root) {
            match child.tag_name().name() {
                "simpleType" | "annotation" => {}
                "complexType" => {
                    let name = required_attribute(child, "name")?;
                    let ty = compiler.complex_type(child)?;
                    schema.complex_types.insert(name.to_string(), ty);
                }
                "element" => {
                    let decl = compiler.element_decl(child)?;
                    schema.elements.insert(decl.name.clone(), decl);
                }
                other => return Err(SchemaError::Unsupported(other.to_string())),
            }
        }

        schema.check_references()?;
        log::info!(
            "Compiled schema with {} global elements and {} complex types",
            schema.elements.len(),
            schema.complex_types.len()
        );
        Ok(schema)
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        for decl in self.elements.values() {
            self.check_element_type(&decl.ty)?;
        }
        for ty in self.complex_types.values() {
            self.check_complex(ty)?;
        }
        Ok(())
    }

    fn check_element_type(&self, ty: &ElementType) -> Result<(), SchemaError> {
        match ty {
            ElementType::Simple(_) => Ok(()),
            ElementType::Complex(ct) => self.check_complex(ct),
            ElementType::Named(name) if self.complex_types.contains_key(name) => Ok(()),
            ElementType::Named(name) => Err(SchemaError::Unresolved {
                kind: "type",
                name: name.clone(),
            }),
        }
    }

    fn check_complex(&self, ty: &ComplexType) -> Result<(), SchemaError> {
        match &ty.content {
            Content::Group(particle) => self.check_particle(particle),
            _ => Ok(()),
        }
    }

    fn check_particle(&self, particle: &Particle) -> Result<(), SchemaError> {
        match &particle.term {
            Term::Element(ElementRef::Local(decl)) => self.check_element_type(&decl.ty),
            Term::Element(ElementRef::Global(name)) if self.elements.contains_key(name) => Ok(()),
            Term::Element(ElementRef::Global(name)) => Err(SchemaError::Unresolved {
                kind: "element",
                name: name.clone(),
            }),
            Term::Group(_, particles) => particles.iter().try_for_each(|p| self.check_particle(p)),
        }
    }
}

#[derive(Default)]
struct Compiler {
    simple_types: HashMap<String, SimpleType>,
}

impl Compiler {
    fn element_decl(&self, node: Node<'_, '_>) -> Result<ElementDecl, SchemaError> {
        let name = required_attribute(node, "name")?.to_string();
        let ty = if let Some(type_name) = node.attribute("type") {
            match self.resolve_simple(node, type_name)? {
                Some(simple) => ElementType::Simple(simple),
                None => ElementType::Named(local_name(type_name).to_string()),
            }
        } else if let Some(ct) = xsd_child(node, "complexType") {
            ElementType::Complex(Box::new(self.complex_type(ct)?))
        } else if let Some(st) = xsd_child(node, "simpleType") {
            ElementType::Simple(self.simple_type(st)?)
        } else {
            ElementType::Simple(SimpleType::builtin(Builtin::String))
        };
        Ok(ElementDecl { name, ty })
    }

    fn complex_type(&self, node: Node<'_, '_>) -> Result<ComplexType, SchemaError> {
        let mut ty = ComplexType {
            mixed: node.attribute("mixed") == Some("true"),
            ..Default::default()
        };
        for child in xsd_children(node) {
            match child.tag_name().name() {
                "annotation" => {}
                "sequence" | "choice" | "all" => {
                    ty.content = Content::Group(self.group(child, true)?);
                }
                "attribute" => ty.attributes.push(self.attribute(child)?),
                "simpleContent" => {
                    let extension = xsd_child(child, "extension")
                        .ok_or_else(|| SchemaError::Unsupported("simpleContent".to_string()))?;
                    let base = required_attribute(extension, "base")?;
                    let simple = self.resolve_simple(extension, base)?.ok_or_else(|| {
                        SchemaError::Unresolved {
                            kind: "simple type",
                            name: base.to_string(),
                        }
                    })?;
                    ty.content = Content::Simple(simple);
                    for attribute in
                        xsd_children(extension).filter(|a| a.tag_name().name() == "attribute")
                    {
                        ty.attributes.push(self.attribute(attribute)?);
                    }
                }
                other => return Err(SchemaError::Unsupported(other.to_string())),
            }
        }
        Ok(ty)
    }

    fn group(&self, node: Node<'_, '_>, top_level: bool) -> Result<Particle, SchemaError> {
        let kind = match node.tag_name().name() {
            "sequence" => GroupKind::Sequence,
            "choice" => GroupKind::Choice,
            "all" if top_level => GroupKind::All,
            other => return Err(SchemaError::Unsupported(other.to_string())),
        };

        let mut particles = Vec::new();
        for child in xsd_children(node) {
            match child.tag_name().name() {
                "annotation" => {}
                "element" => {
                    let element = match child.attribute("ref") {
                        Some(name) => ElementRef::Global(local_name(name).to_string()),
                        None => ElementRef::Local(Box::new(self.element_decl(child)?)),
                    };
                    particles.push(Particle {
                        term: Term::Element(element),
                        occurs: occurs(child)?,
                    });
                }
                "sequence" | "choice" => particles.push(self.group(child, false)?),
                other => return Err(SchemaError::Unsupported(other.to_string())),
            }
        }

        Ok(Particle {
            term: Term::Group(kind, particles),
            occurs: occurs(node)?,
        })
    }

    fn attribute(&self, node: Node<'_, '_>) -> Result<AttributeDecl, SchemaError> {
        let name = required_attribute(node, "name")?.to_string();
        let ty = if let Some(type_name) = node.attribute("type") {
            self.resolve_simple(node, type_name)?
                .ok_or_else(|| SchemaError::Unresolved {
                    kind: "simple type",
                    name: type_name.to_string(),
                })?
        } else if let Some(st) = xsd_child(node, "simpleType") {
            self.simple_type(st)?
        } else {
            SimpleType::builtin(Builtin::String)
        };
        Ok(AttributeDecl {
            name,
            ty,
            required: node.attribute("use") == Some("required"),
        })
    }

    fn simple_type(&self, node: Node<'_, '_>) -> Result<SimpleType, SchemaError> {
        let restriction = xsd_child(node, "restriction").ok_or_else(|| {
            let construct = xsd_children(node)
                .next()
                .map(|c| c.tag_name().name().to_string())
                .unwrap_or_else(|| "simpleType".to_string());
            SchemaError::Unsupported(construct)
        })?;
        let base_name = required_attribute(restriction, "base")?;
        let mut ty = self
            .resolve_simple(restriction, base_name)?
            .ok_or_else(|| SchemaError::Unresolved {
                kind: "simple type",
                name: base_name.to_string(),
            })?;

        let values: Vec<String> = xsd_children(restriction)
            .filter(|c| c.tag_name().name() == "enumeration")
            .filter_map(|c| c.attribute("value"))
            .map(str::to_string)
            .collect();
        if !values.is_empty() {
            ty.enumeration = Some(values);
        }
        Ok(ty)
    }

    /// Resolves a type name to a simple type. Returns `Ok(None)` for names
    /// that are not simple types, which then refer to complex types.
    fn resolve_simple(
        &self,
        node: Node<'_, '_>,
        qname: &str,
    ) -> Result<Option<SimpleType>, SchemaError> {
        let (prefix, local) = match qname.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, qname),
        };
        if node.lookup_namespace_uri(prefix) == Some(XSD_NS) {
            return Builtin::from_local_name(local)
                .map(|b| Some(SimpleType::builtin(b)))
                .ok_or_else(|| SchemaError::UnsupportedType(qname.to_string()));
        }
        Ok(self.simple_types.get(local).cloned())
    }
}

fn xsd_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(|c| c.is_element() && c.tag_name().namespace() == Some(XSD_NS))
}

fn xsd_child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    xsd_children(node).find(|c| c.tag_name().name() == name)
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, SchemaError> {
    node.attribute(name).ok_or_else(|| SchemaError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name.to_string(),
    })
}

fn local_name(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

fn occurs(node: Node<'_, '_>) -> Result<Occurs, SchemaError> {
    let parse = |raw: &str| {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| SchemaError::InvalidOccurs(raw.to_string()))
    };
    let min = node.attribute("minOccurs").map(parse).transpose()?.unwrap_or(1);
    let max = match node.attribute("maxOccurs") {
        Some("unbounded") => None,
        Some(raw) => Some(parse(raw)?),
        None => Some(1),
    };
    Ok(Occurs { min, max })
}
