use std::fmt;

/// What went wrong, independent of message wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    NoGlobalDeclaration,
    AttributeNotAllowed,
    AttributeMissing,
    /// The value is not in the lexical space of the named atomic type.
    InvalidValue { type_name: String },
    EnumerationMismatch,
    DuplicateId,
    UnknownIdRef,
    UnexpectedElement,
    MissingElement,
    CharacterContent,
    ElementContent,
}

/// One finding produced by [`crate::Schema::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub element: String,
    pub attribute: Option<String>,
    pub value: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl SchemaIssue {
    pub(crate) fn element(element: &str, kind: IssueKind, message: String) -> Self {
        Self {
            element: element.to_string(),
            attribute: None,
            value: None,
            kind,
            message,
        }
    }

    pub(crate) fn attribute(
        element: &str,
        attribute: &str,
        value: Option<&str>,
        kind: IssueKind,
        message: String,
    ) -> Self {
        Self {
            element: element.to_string(),
            attribute: Some(attribute.to_string()),
            value: value.map(str::to_string),
            kind,
            message,
        }
    }
}
