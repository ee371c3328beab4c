//! QMRF report documents.
//!
//! A [`QmrfReport`] owns one QMRF 1.3 document tree, loaded from a template
//! at construction. Values are written by field name, the yes/no style
//! availability nodes take attribute edits, and reusable catalog entries
//! (software, algorithms, descriptors, endpoints, publications, authors)
//! are upserted by id and linked into chapters by reference.
//!
//! ```ignore
//! use qsar_qmrf::{Catalog, QmrfReport};
//!
//! let mut report = QmrfReport::new()?;
//! report.set_value("QSAR_title", "My QSAR Title")?;
//! report.upsert_entry(Catalog::Publications, "pub1", [("title", "T"), ("url", "U")])?;
//! report.add_reference("bibliography", Catalog::Publications, "pub1")?;
//! assert!(report.validate().is_empty());
//! println!("{}", report.to_xml()?);
//! ```

mod catalog;
mod error;
mod fields;
mod report;
mod validate;

pub use catalog::{Catalog, catalog_exists};
pub use error::QmrfError;
pub use fields::{AttributeTarget, FieldInfo, PROTECTED_FIELDS};
pub use report::QmrfReport;
pub use validate::{BENIGN_ISSUES, BenignIssue};

/// The QMRF 1.3 template every new report starts from.
pub const TEMPLATE: &str = include_str!("../template/qmrf.xml");

/// The schema QMRF documents are validated against.
pub const SCHEMA: &str = include_str!("../template/qmrf.xsd");
