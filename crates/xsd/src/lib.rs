//! Schema validation for report documents.
//!
//! A schema asset is compiled once into a [`Schema`] and then checked
//! against any number of [`qsar_xml::XmlDocument`]s. Only the part of XML
//! Schema needed by report schemas is understood:
//!
//! - global elements, named and anonymous complex/simple types
//! - `sequence`, `choice` and `all` groups with `minOccurs`/`maxOccurs`
//! - mixed, empty and simple content (`simpleContent/extension`)
//! - attributes with `use="required"` and enumeration facets
//! - `xs:ID`/`xs:IDREF` with document-wide resolution
//!
//! Validation never stops at the first problem. Every finding is returned
//! as a [`SchemaIssue`] carrying both the structured location and a message
//! worded the way libxml2 reports it.

mod compile;
mod error;
mod issue;
mod model;
mod validate;

pub use error::SchemaError;
pub use issue::{IssueKind, SchemaIssue};
pub use model::{Builtin, Schema, SimpleType};
