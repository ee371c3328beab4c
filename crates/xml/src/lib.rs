//! Owned markup tree used as the backing store of template-based reports.
//!
//! Templates are parsed once with `roxmltree` and copied into an arena of
//! nodes that can be edited in place. Serialization goes through `quick-xml`
//! and is byte-stable: attribute order and child order are kept exactly as
//! parsed or inserted, and whitespace-only text is preserved.

mod document;
mod error;
mod writer;

pub use document::{Element, NodeId, NodeKind, XmlDocument};
pub use error::XmlError;
