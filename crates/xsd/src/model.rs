use std::collections::HashMap;

/// A compiled schema: global element declarations plus the named types
/// they refer to.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) elements: HashMap<String, ElementDecl>,
    pub(crate) complex_types: HashMap<String, ComplexType>,
}

impl Schema {
    /// Names of the global element declarations.
    pub fn global_elements(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElementDecl {
    pub name: String,
    pub ty: ElementType,
}

#[derive(Debug, Clone)]
pub(crate) enum ElementType {
    Simple(SimpleType),
    Complex(Box<ComplexType>),
    /// A named complex type, looked up in [`Schema::complex_types`].
    Named(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ComplexType {
    pub mixed: bool,
    pub content: Content,
    pub attributes: Vec<AttributeDecl>,
}

#[derive(Debug, Clone, Default)]
pub(crate) enum Content {
    #[default]
    Empty,
    Simple(SimpleType),
    Group(Particle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occurs {
    pub min: u32,
    /// `None` is `unbounded`.
    pub max: Option<u32>,
}

impl Default for Occurs {
    fn default() -> Self {
        Self {
            min: 1,
            max: Some(1),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Particle {
    pub term: Term,
    pub occurs: Occurs,
}

#[derive(Debug, Clone)]
pub(crate) enum Term {
    Element(ElementRef),
    Group(GroupKind, Vec<Particle>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupKind {
    Sequence,
    Choice,
    All,
}

#[derive(Debug, Clone)]
pub(crate) enum ElementRef {
    Local(Box<ElementDecl>),
    Global(String),
}

impl ElementRef {
    pub fn name(&self) -> &str {
        match self {
            ElementRef::Local(decl) => &decl.name,
            ElementRef::Global(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AttributeDecl {
    pub name: String,
    pub ty: SimpleType,
    pub required: bool,
}

/// Built-in atomic types understood by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    String,
    Id,
    IdRef,
    AnyUri,
    Integer,
    Boolean,
}

impl Builtin {
    pub fn from_local_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" | "normalizedString" | "token" | "anyType" | "anySimpleType" => {
                Builtin::String
            }
            "ID" => Builtin::Id,
            "IDREF" => Builtin::IdRef,
            "anyURI" => Builtin::AnyUri,
            "integer" | "int" | "nonNegativeInteger" | "positiveInteger" => Builtin::Integer,
            "boolean" => Builtin::Boolean,
            _ => return None,
        })
    }

    /// The qualified name used in issue messages.
    pub fn qualified_name(self) -> &'static str {
        match self {
            Builtin::String => "xs:string",
            Builtin::Id => "xs:ID",
            Builtin::IdRef => "xs:IDREF",
            Builtin::AnyUri => "xs:anyURI",
            Builtin::Integer => "xs:integer",
            Builtin::Boolean => "xs:boolean",
        }
    }

    /// Whether `value` is in the lexical space of this type.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Builtin::String | Builtin::AnyUri => true,
            Builtin::Id | Builtin::IdRef => is_ncname(value.trim()),
            Builtin::Integer => {
                let v = value.trim();
                let digits = v.strip_prefix(['+', '-']).unwrap_or(v);
                !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
            }
            Builtin::Boolean => matches!(value.trim(), "true" | "false" | "1" | "0"),
        }
    }
}

fn is_ncname(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// An atomic type, optionally restricted to a set of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleType {
    pub base: Builtin,
    pub enumeration: Option<Vec<String>>,
}

impl SimpleType {
    pub fn builtin(base: Builtin) -> Self {
        Self {
            base,
            enumeration: None,
        }
    }
}
