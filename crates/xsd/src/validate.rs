use crate::issue::{IssueKind, SchemaIssue};
use crate::model::{
    AttributeDecl, Builtin, ComplexType, Content, ElementRef, ElementType, GroupKind, Particle,
    Schema, SimpleType, Term,
};
use qsar_xml::{NodeId, NodeKind, XmlDocument};
use std::collections::HashSet;

impl Schema {
    /// Checks `doc` against this schema and returns every issue found, in
    /// document order. Unresolved `xs:IDREF` values are reported last.
    pub fn validate(&self, doc: &XmlDocument) -> Vec<SchemaIssue> {
        let mut run = Run {
            schema: self,
            doc,
            issues: Vec::new(),
            ids: HashSet::new(),
            idrefs: Vec::new(),
        };

        let root = doc.root();
        let name = doc.name(root).unwrap_or_default();
        match self.elements.get(name) {
            Some(decl) => run.element(root, &decl.ty),
            None => run.issues.push(SchemaIssue::element(
                name,
                IssueKind::NoGlobalDeclaration,
                format!(
                    "Element '{name}': No matching global declaration available for the validation root."
                ),
            )),
        }
        run.resolve_idrefs();

        log::debug!("Schema validation finished with {} issues", run.issues.len());
        run.issues
    }
}

enum Step {
    /// At least one element was matched.
    Consumed,
    /// Satisfied without matching anything.
    Empty,
    NoMatch,
}

/// A content-model error was reported and matching of the parent stops.
struct Stop;

struct IdRef {
    element: String,
    attribute: String,
    value: String,
}

struct Run<'s> {
    schema: &'s Schema,
    doc: &'s XmlDocument,
    issues: Vec<SchemaIssue>,
    ids: HashSet<String>,
    idrefs: Vec<IdRef>,
}

impl<'s> Run<'s> {
    fn element(&mut self, id: NodeId, ty: &'s ElementType) {
        let name = self.doc.name(id).unwrap_or_default().to_string();
        let schema = self.schema;
        match ty {
            ElementType::Simple(simple) => {
                self.attributes(id, &name, &[]);
                self.simple_content(id, &name, simple);
            }
            ElementType::Complex(complex) => self.complex(id, &name, complex),
            ElementType::Named(type_name) => {
                if let Some(complex) = schema.complex_types.get(type_name) {
                    self.complex(id, &name, complex);
                }
            }
        }
    }

    fn complex(&mut self, id: NodeId, name: &str, ty: &'s ComplexType) {
        self.attributes(id, name, &ty.attributes);
        match &ty.content {
            Content::Empty => {
                if self.doc.child_elements(id).next().is_some() {
                    self.push_element(
                        name,
                        IssueKind::ElementContent,
                        format!(
                            "Element '{name}': Element content is not allowed, because the content type is empty."
                        ),
                    );
                }
                if !ty.mixed && self.has_text(id) {
                    self.push_element(
                        name,
                        IssueKind::CharacterContent,
                        format!(
                            "Element '{name}': Character content is not allowed, because the content type is empty."
                        ),
                    );
                }
            }
            Content::Simple(simple) => self.simple_content(id, name, simple),
            Content::Group(particle) => {
                if !ty.mixed && self.has_text(id) {
                    self.push_element(
                        name,
                        IssueKind::CharacterContent,
                        format!(
                            "Element '{name}': Character content other than whitespace is not allowed because the content type is 'element-only'."
                        ),
                    );
                }
                self.children(id, name, particle);
            }
        }
    }

    fn simple_content(&mut self, id: NodeId, name: &str, ty: &SimpleType) {
        if self.doc.child_elements(id).next().is_some() {
            self.push_element(
                name,
                IssueKind::ElementContent,
                format!(
                    "Element '{name}': Element content is not allowed, because the type definition is simple."
                ),
            );
            return;
        }
        let value = self.doc.text_content(id);
        self.check_value(name, None, &value, ty);
    }

    fn has_text(&self, id: NodeId) -> bool {
        self.doc.children(id).iter().any(|c| {
            matches!(self.doc.kind(*c), NodeKind::Text(t) if !t.trim().is_empty())
        })
    }

    fn attributes(&mut self, id: NodeId, name: &str, decls: &[AttributeDecl]) {
        let doc = self.doc;
        let Some(present) = doc.attributes(id) else {
            return;
        };

        for (key, value) in present {
            match decls.iter().find(|d| d.name == *key) {
                Some(decl) => self.check_value(name, Some(key), value, &decl.ty),
                None => self.issues.push(SchemaIssue::attribute(
                    name,
                    key,
                    Some(value),
                    IssueKind::AttributeNotAllowed,
                    format!(
                        "Element '{name}', attribute '{key}': The attribute '{key}' is not allowed."
                    ),
                )),
            }
        }

        for decl in decls.iter().filter(|d| d.required) {
            if !present.contains_key(&decl.name) {
                self.issues.push(SchemaIssue::attribute(
                    name,
                    &decl.name,
                    None,
                    IssueKind::AttributeMissing,
                    format!(
                        "Element '{name}': The attribute '{}' is required but missing.",
                        decl.name
                    ),
                ));
            }
        }
    }

    fn check_value(&mut self, element: &str, attribute: Option<&str>, value: &str, ty: &SimpleType) {
        let location = match attribute {
            Some(a) => format!("Element '{element}', attribute '{a}'"),
            None => format!("Element '{element}'"),
        };

        if !ty.base.accepts(value) {
            let type_name = ty.base.qualified_name();
            self.push_value(
                element,
                attribute,
                value,
                IssueKind::InvalidValue {
                    type_name: type_name.to_string(),
                },
                format!("{location}: '{value}' is not a valid value of the atomic type '{type_name}'."),
            );
            return;
        }

        if let Some(allowed) = &ty.enumeration
            && !allowed.iter().any(|a| a == value.trim())
        {
            let set = allowed
                .iter()
                .map(|a| format!("'{a}'"))
                .collect::<Vec<_>>()
                .join(", ");
            self.push_value(
                element,
                attribute,
                value,
                IssueKind::EnumerationMismatch,
                format!(
                    "{location}: [facet 'enumeration'] The value '{value}' is not an element of the set {{{set}}}."
                ),
            );
            return;
        }

        match ty.base {
            Builtin::Id => {
                if !self.ids.insert(value.trim().to_string()) {
                    self.push_value(
                        element,
                        attribute,
                        value,
                        IssueKind::DuplicateId,
                        format!("{location}: '{value}' is not a valid value of the atomic type 'xs:ID'."),
                    );
                }
            }
            Builtin::IdRef => self.idrefs.push(IdRef {
                element: element.to_string(),
                attribute: attribute.unwrap_or_default().to_string(),
                value: value.trim().to_string(),
            }),
            _ => {}
        }
    }

    fn resolve_idrefs(&mut self) {
        for idref in std::mem::take(&mut self.idrefs) {
            if !self.ids.contains(&idref.value) {
                self.issues.push(SchemaIssue::attribute(
                    &idref.element,
                    &idref.attribute,
                    Some(&idref.value),
                    IssueKind::UnknownIdRef,
                    format!(
                        "IDREF attribute {} references an unknown ID \"{}\"",
                        idref.attribute, idref.value
                    ),
                ));
            }
        }
    }

    fn children(&mut self, id: NodeId, name: &str, particle: &'s Particle) {
        let children: Vec<NodeId> = self.doc.child_elements(id).collect();

        if let Term::Group(GroupKind::All, particles) = &particle.term {
            self.all_group(name, &children, particles);
            return;
        }

        let mut pos = 0;
        match self.particle(particle, name, &children, &mut pos) {
            Err(Stop) => {}
            Ok(Step::NoMatch) => {
                let expected = expected_names(&particle.term);
                self.mismatch(name, &children, pos, &expected);
            }
            Ok(_) if pos < children.len() => self.mismatch(name, &children, pos, &[]),
            Ok(_) => {}
        }
    }

    fn all_group(&mut self, name: &str, children: &[NodeId], particles: &'s [Particle]) {
        let doc = self.doc;
        let mut counts = vec![0u32; particles.len()];

        for &child in children {
            let child_name = doc.name(child).unwrap_or_default();
            let slot = particles.iter().position(|p| {
                matches!(&p.term, Term::Element(r) if r.name() == child_name)
            });
            match slot {
                Some(i) if particles[i].occurs.max.is_none_or(|m| counts[i] < m) => {
                    counts[i] += 1;
                    if let Term::Element(r) = &particles[i].term
                        && let Some(ty) = self.resolve(r)
                    {
                        self.element(child, ty);
                    }
                }
                _ => self.push_element(
                    child_name,
                    IssueKind::UnexpectedElement,
                    format!("Element '{child_name}': This element is not expected."),
                ),
            }
        }

        for (particle, count) in particles.iter().zip(counts) {
            if count < particle.occurs.min {
                let expected = expected_names(&particle.term);
                self.mismatch(name, children, children.len(), &expected);
            }
        }
    }

    fn particle(
        &mut self,
        particle: &'s Particle,
        parent: &str,
        children: &[NodeId],
        pos: &mut usize,
    ) -> Result<Step, Stop> {
        let start = *pos;
        let mut count = 0u32;
        let mut nullable = false;

        while particle.occurs.max.is_none_or(|m| count < m) {
            match self.term(&particle.term, parent, children, pos)? {
                Step::Consumed => count += 1,
                Step::Empty => {
                    nullable = true;
                    break;
                }
                Step::NoMatch => break,
            }
        }

        let consumed = *pos > start;
        if count >= particle.occurs.min || nullable {
            return Ok(if consumed { Step::Consumed } else { Step::Empty });
        }
        if !consumed {
            return Ok(Step::NoMatch);
        }
        let expected = expected_names(&particle.term);
        self.mismatch(parent, children, *pos, &expected);
        Err(Stop)
    }

    fn term(
        &mut self,
        term: &'s Term,
        parent: &str,
        children: &[NodeId],
        pos: &mut usize,
    ) -> Result<Step, Stop> {
        match term {
            Term::Element(r) => {
                let Some(&child) = children.get(*pos) else {
                    return Ok(Step::NoMatch);
                };
                if self.doc.name(child) != Some(r.name()) {
                    return Ok(Step::NoMatch);
                }
                if let Some(ty) = self.resolve(r) {
                    self.element(child, ty);
                }
                *pos += 1;
                Ok(Step::Consumed)
            }
            Term::Group(GroupKind::Choice, options) => {
                let mut nullable = false;
                for option in options {
                    match self.particle(option, parent, children, pos)? {
                        Step::Consumed => return Ok(Step::Consumed),
                        Step::Empty => nullable = true,
                        Step::NoMatch => {}
                    }
                }
                Ok(if nullable { Step::Empty } else { Step::NoMatch })
            }
            Term::Group(_, particles) => {
                let start = *pos;
                for particle in particles {
                    if let Step::NoMatch = self.particle(particle, parent, children, pos)? {
                        if *pos == start {
                            return Ok(Step::NoMatch);
                        }
                        let expected = expected_names(&particle.term);
                        self.mismatch(parent, children, *pos, &expected);
                        return Err(Stop);
                    }
                }
                Ok(if *pos > start { Step::Consumed } else { Step::Empty })
            }
        }
    }

    fn resolve(&self, r: &'s ElementRef) -> Option<&'s ElementType> {
        match r {
            ElementRef::Local(decl) => Some(&decl.ty),
            ElementRef::Global(name) => {
                let schema: &'s Schema = self.schema;
                schema.elements.get(name).map(|d| &d.ty)
            }
        }
    }

    fn mismatch(&mut self, parent: &str, children: &[NodeId], pos: usize, expected: &[String]) {
        let hint = match expected {
            [] => String::new(),
            [one] => format!(" Expected is ( {one} )."),
            many => format!(" Expected is one of ( {} ).", many.join(", ")),
        };
        match children.get(pos) {
            Some(&child) => {
                let child_name = self.doc.name(child).unwrap_or_default().to_string();
                self.push_element(
                    &child_name,
                    IssueKind::UnexpectedElement,
                    format!("Element '{child_name}': This element is not expected.{hint}"),
                );
            }
            None => self.push_element(
                parent,
                IssueKind::MissingElement,
                format!("Element '{parent}': Missing child element(s).{hint}"),
            ),
        }
    }

    fn push_element(&mut self, element: &str, kind: IssueKind, message: String) {
        self.issues.push(SchemaIssue::element(element, kind, message));
    }

    fn push_value(
        &mut self,
        element: &str,
        attribute: Option<&str>,
        value: &str,
        kind: IssueKind,
        message: String,
    ) {
        let issue = match attribute {
            Some(a) => SchemaIssue::attribute(element, a, Some(value), kind, message),
            None => SchemaIssue {
                value: Some(value.to_string()),
                ..SchemaIssue::element(element, kind, message)
            },
        };
        self.issues.push(issue);
    }
}

/// Element names that may start a match of `term`.
fn expected_names(term: &Term) -> Vec<String> {
    match term {
        Term::Element(r) => vec![r.name().to_string()],
        Term::Group(GroupKind::Sequence, particles) => {
            let mut names = Vec::new();
            for particle in particles {
                names.extend(expected_names(&particle.term));
                if particle.occurs.min > 0 {
                    break;
                }
            }
            names
        }
        Term::Group(_, particles) => particles
            .iter()
            .flat_map(|p| expected_names(&p.term))
            .collect(),
    }
}
