//! QPRF report documents.
//!
//! A QPRF report is a JSON document with a metadata block (title, version,
//! date) and four sections of `[label, value]` pairs keyed by chapter code.
//! The section of a code is taken from its leading number, so `"1.1"` lives
//! in `"1. Substance"` and `"3.2 d."` in `"3. Prediction"`.
//!
//! ```ignore
//! use qsar_qprf::QprfReport;
//!
//! let mut report = QprfReport::new()?;
//! report.set_title("My QPRF Report");
//! report.set_version("1");
//! report.value("1.1", Some("7732-18-5"))?;
//! println!("{}", report.to_html()?);
//! ```

mod error;
mod report;
mod section;

pub use error::QprfError;
pub use report::{Chapter, QprfReport};
pub use section::Section;

/// The QPRF 1.1 template every new report starts from.
pub const TEMPLATE: &str = include_str!("../template/qprf.json");

/// Handlebars template for [`QprfReport::to_html`].
pub const HTML_TEMPLATE: &str = include_str!("../template/qprf.hbs");
