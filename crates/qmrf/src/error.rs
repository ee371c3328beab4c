use crate::catalog::Catalog;
use qsar_xml::XmlError;
use qsar_xsd::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QmrfError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Can not edit '{0}' directly, edit its catalog entry instead")]
    ProtectedField(String),

    #[error("'{0}' contains child elements and has no editable value")]
    StructuralField(String),

    #[error("Attributes of '{0}' can not be edited")]
    UnsupportedAttributeTarget(String),

    #[error("Node '{node}' has no attribute '{attribute}'")]
    UnknownAttribute { node: String, attribute: String },

    #[error("Unknown catalog: {0}")]
    UnknownCatalog(String),

    #[error("Catalog entry with id '{id}' does not exist in {catalog}")]
    DanglingReference { catalog: Catalog, id: String },

    #[error("The '{0}' attribute identifies a catalog entry and can not be changed")]
    ReservedAttribute(String),

    #[error("Template has no <{0}> element")]
    MissingCatalog(Catalog),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
