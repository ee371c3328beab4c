//! QSAR model (QMRF) and prediction (QPRF) reports.
//!
//! This crate ties the report crates together: [`ReportConfig`] chooses the
//! template, schema and HTML assets reports are built from, and the
//! [`view`] module renders QMRF documents to HTML. QPRF reports render
//! themselves with [`QprfReport::to_html`].
//!
//! # Example
//!
//! ```ignore
//! use qsar_report::{Catalog, QmrfReport, ReportConfig};
//!
//! let config = ReportConfig::new();
//! let mut report = config.qmrf_report()?;
//! report.set_value("QSAR_title", "Model for rat carcinogenicity")?;
//! report.upsert_entry(Catalog::Software, "lazar", [("name", "lazar")])?;
//! report.add_reference("QSAR_software", Catalog::Software, "lazar")?;
//!
//! for problem in report.validate() {
//!     eprintln!("{problem}");
//! }
//! let html = qsar_report::view::qmrf_html(&report, &config.qmrf_html_template()?)?;
//! ```

pub mod config;
pub mod error;
pub mod view;

pub use config::ReportConfig;
pub use error::ReportError;

pub use qsar_qmrf::{AttributeTarget, Catalog, FieldInfo, QmrfError, QmrfReport};
pub use qsar_qprf::{Chapter, QprfError, QprfReport, Section};
pub use qsar_xml::XmlDocument;
pub use qsar_xsd::SchemaIssue;
