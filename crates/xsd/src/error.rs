use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("Document root is <{0}>, expected <xs:schema>")]
    NotASchema(String),

    #[error("Unsupported schema construct <xs:{0}>")]
    Unsupported(String),

    #[error("<xs:{element}> is missing the '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },

    #[error("Unsupported type '{0}'")]
    UnsupportedType(String),

    #[error("Invalid occurrence bound '{0}'")]
    InvalidOccurs(String),

    #[error("Unresolved {kind} reference '{name}'")]
    Unresolved { kind: &'static str, name: String },
}
